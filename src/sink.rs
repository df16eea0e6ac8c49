//! Escaping and transmission of the compiled filter
//!
//! The target application's filter box interprets `(`, `)`, spaces, and `%`
//! specially during simulated typing, so each of those characters is wrapped
//! as `{<char>}` before transmission. Transmission itself is a best-effort
//! external call, independent of compilation: a sink failure never
//! invalidates the computed filter string.

use std::process::Command;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("No sink command configured; set [sink] command in the panel config")]
    NotConfigured,
    #[error("Failed to launch sink command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Sink command '{command}' exited with {status}")]
    Failed {
        command: String,
        status: std::process::ExitStatus,
    },
}

/// Wrap each of `(`, `)`, space, and `%` as `{<char>}`.
///
/// Every other character passes through untouched; the mapping is bit-exact
/// and applies to each occurrence individually.
pub fn escape(filter: &str) -> String {
    let mut escaped = String::with_capacity(filter.len());
    for c in filter.chars() {
        match c {
            '(' | ')' | ' ' | '%' => {
                escaped.push('{');
                escaped.push(c);
                escaped.push('}');
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Anything that can deliver an escaped filter string to the target
/// application in a single transmission.
pub trait InjectionSink {
    fn send(&self, escaped: &str) -> Result<(), SinkError>;
}

/// Runs an external automation command with the escaped filter appended as
/// the last argument.
#[derive(Debug, Clone)]
pub struct CommandSink {
    command: Vec<String>,
}

impl CommandSink {
    pub fn new(command: Vec<String>) -> Self {
        CommandSink { command }
    }

    fn display_name(&self) -> String {
        self.command.join(" ")
    }
}

impl InjectionSink for CommandSink {
    fn send(&self, escaped: &str) -> Result<(), SinkError> {
        let (program, args) = self.command.split_first().ok_or(SinkError::NotConfigured)?;

        let status = Command::new(program)
            .args(args)
            .arg(escaped)
            .status()
            .map_err(|source| SinkError::Spawn {
                command: self.display_name(),
                source,
            })?;

        if !status.success() {
            return Err(SinkError::Failed {
                command: self.display_name(),
                status,
            });
        }
        Ok(())
    }
}

/// Prints the escaped filter for a manual copy-paste workflow.
#[derive(Debug, Clone, Default)]
pub struct StdoutSink;

impl InjectionSink for StdoutSink {
    fn send(&self, escaped: &str) -> Result<(), SinkError> {
        println!("{}", escaped);
        Ok(())
    }
}
