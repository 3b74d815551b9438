//! Integration tests for linopt live in `tests/`.
