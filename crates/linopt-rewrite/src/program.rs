//! Programs, statement blocks and the configured rewrite pipeline.

use linopt_hops::{HopDag, HopId, HopsError};

use crate::config::RewriterConfig;
use crate::constant_folding::RewriteConstantFolding;
use crate::errors::RewriteError;
use crate::rule::{HopRewriteRule, ProgramRewriteStatus};

/// A statement block: the output hops of one straight-line region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementBlock {
    pub name: String,
    pub roots: Vec<HopId>,
}

impl StatementBlock {
    pub fn new(name: impl Into<String>, roots: Vec<HopId>) -> Self {
        Self {
            name: name.into(),
            roots,
        }
    }
}

/// A compiled program: one hop DAG shared by its statement blocks.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub dag: HopDag,
    pub blocks: Vec<StatementBlock>,
}

impl Program {
    pub fn new(dag: HopDag) -> Self {
        Self {
            dag,
            blocks: Vec::new(),
        }
    }

    pub fn add_block(&mut self, name: impl Into<String>, roots: Vec<HopId>) {
        self.blocks.push(StatementBlock::new(name, roots));
    }

    /// Render the DAG of every block, headed by its name.
    pub fn explain(&self) -> Result<String, HopsError> {
        let mut out = String::new();
        for block in &self.blocks {
            out.push_str(&format!("--- {} ---\n", block.name));
            out.push_str(&self.dag.explain(&block.roots)?);
        }
        Ok(out)
    }
}

/// Applies a sequence of rules to every statement block of a program.
pub struct ProgramRewriter {
    config: RewriterConfig,
    rules: Vec<Box<dyn HopRewriteRule>>,
}

impl ProgramRewriter {
    /// Build the rule pipeline selected by `config`.
    pub fn new(config: RewriterConfig) -> Result<Self, RewriteError> {
        let config = config.validate()?;
        let mut rules: Vec<Box<dyn HopRewriteRule>> = Vec::new();
        if config.constant_folding {
            rules.push(Box::new(
                RewriteConstantFolding::new().fold_predicates(config.fold_predicates),
            ));
        }
        Ok(Self { config, rules })
    }

    /// Append a rule that runs after the configured ones.
    pub fn with_rule(mut self, rule: Box<dyn HopRewriteRule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn config(&self) -> &RewriterConfig {
        &self.config
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Run every rule over every statement block in order.
    ///
    /// Block roots are updated in place. The first structural error aborts
    /// the rewrite and leaves the failing block's roots as they were.
    pub fn rewrite_program(&mut self, program: &mut Program) -> Result<ProgramRewriteStatus, RewriteError> {
        let mut status = ProgramRewriteStatus::default();
        let Program { dag, blocks } = program;

        for block in blocks.iter_mut() {
            if self.config.verify_dag {
                verify(dag, block)?;
            }
            for rule in &mut self.rules {
                let name = rule.name();
                let mut block_status = ProgramRewriteStatus::default();
                block.roots = rule
                    .rewrite_hop_dags(dag, block.roots.clone(), &mut block_status)
                    .map_err(|source| RewriteError::Rule {
                        rule: name,
                        block: block.name.clone(),
                        source,
                    })?;
                #[cfg(feature = "tracing")]
                tracing::debug!(rule = name, block = %block.name, status = %block_status, "rule applied");
                status.merge(&block_status);
            }
            if self.config.verify_dag {
                verify(dag, block)?;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::info!(
            blocks = blocks.len(),
            folds = status.folds(),
            eval_failures = status.eval_failures,
            "program rewrite finished"
        );
        Ok(status)
    }
}

fn verify(dag: &HopDag, block: &StatementBlock) -> Result<(), RewriteError> {
    dag.validate(&block.roots)
        .map_err(|source| RewriteError::MalformedDag {
            block: block.name.clone(),
            source,
        })
}
