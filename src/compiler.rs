//! Program serialization
//!
//! [`compile`] prints a parsed [`Program`] back as canonical text: one
//! top-level list per line, children separated by a single space, strings
//! quoted and numbers in their shortest form. Whatever `parse_program`
//! skipped during recovery is not reproduced, so the output of `compile`
//! always parses back to the same lists.

use crate::parser::ast::Program;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Also write the result to this path
    pub save_to_file: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Failed to write {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub fn compile(program: &Program, options: &CompileOptions) -> Result<String, CompileError> {
    let mut result = String::new();
    for list in program.lists() {
        result.push_str(&list.to_string());
        result.push('\n');
    }

    if let Some(path) = &options.save_to_file {
        debug!(path = %path.display(), bytes = result.len(), "saving compiled program");
        fs::write(path, &result).map_err(|source| CompileError::Save {
            path: path.clone(),
            source,
        })?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_program;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_canonical_text() {
        let program = parse_program("(define  x\n 1.50)\n\n(  print \"a  b\" (list null true))");
        let text = compile(&program, &CompileOptions::default()).unwrap();
        assert_eq!(text, "(define x 1.5)\n(print \"a  b\" (list null true))\n");
    }

    #[test]
    fn test_skipped_text_is_dropped() {
        let program = parse_program("junk (a) 12 (b ())");
        let text = compile(&program, &CompileOptions::default()).unwrap();
        assert_eq!(text, "(a)\n(b ())\n");
        assert_eq!(compile(&parse_program(&text), &CompileOptions::default()).unwrap(), text);
    }

    #[test]
    fn test_empty_program() {
        let text = compile(&parse_program("   "), &CompileOptions::default()).unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.lsp");
        let options = CompileOptions {
            save_to_file: Some(path.clone()),
        };

        let text = compile(&parse_program("(print 1)"), &options).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), text);
    }

    #[test]
    fn test_save_failure() {
        let dir = tempfile::tempdir().unwrap();
        let options = CompileOptions {
            save_to_file: Some(dir.path().join("missing").join("out.lsp")),
        };
        let err = compile(&parse_program("(a)"), &options).unwrap_err();
        assert!(matches!(err, CompileError::Save { .. }));
    }
}
