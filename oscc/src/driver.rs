use crate::analyze::scope::Scope;
use crate::codegen::emitter::Emitter;
use crate::analyze::Analyzer;
use crate::codegen::Generator;
use crate::error::{Error, Warning};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings of one compiler run
#[derive(Debug, Clone)]
pub struct Options {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Keep tokens, trees and scope tables next to the assembly
    pub intermediate: bool,
}

pub struct Output {
    pub assembly: Emitter,
    pub warnings: Vec<Warning>,
    /// Files written, in order
    pub artifacts: Vec<PathBuf>,
}

#[derive(Serialize)]
struct ScopeTables<'a> {
    globals: &'a Scope,
    scopes: &'a [Scope],
}

struct Artifacts {
    dir: PathBuf,
    stem: String,
    written: Vec<PathBuf>,
}

/// Suffixes of the files written for one input
const SUFFIXES: [&str; 6] = [
    "tokens.json",
    "ast-pre-sa.json",
    "ast-pre-sa.txt",
    "ast-post-sa.json",
    "scopes.yaml",
    "s",
];

impl Artifacts {
    /// Prepare the output directory. Only earlier artifacts of the same input are removed.
    fn create(dir: &Path, input: &Path) -> Result<Self, Error> {
        let stem = input
            .file_stem()
            .map_or_else(|| "out".to_string(), |stem| stem.to_string_lossy().to_string());

        if dir.exists() {
            if fs::canonicalize(input)?.starts_with(fs::canonicalize(dir)?) {
                return Err(Error::OutputContainsInput(dir.display().to_string()));
            }
            for entry in fs::read_dir(dir)? {
                let path = entry?.path();
                if path.is_file() && is_artifact(&path, &stem) {
                    fs::remove_file(&path)?;
                }
            }
        } else {
            fs::create_dir_all(dir)?;
        }

        Ok(Artifacts {
            dir: dir.to_path_buf(),
            stem,
            written: Vec::new(),
        })
    }

    fn write(&mut self, suffix: &str, contents: &str) -> Result<(), Error> {
        let path = self.dir.join(format!("{}.{}", self.stem, suffix));
        fs::write(&path, contents)?;
        self.written.push(path);
        Ok(())
    }
}

fn is_artifact(path: &Path, stem: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_prefix(stem))
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|suffix| SUFFIXES.contains(&suffix))
}

pub fn compile(options: &Options) -> Result<Output, Error> {
    let source = fs::read_to_string(&options.input)?;
    let file = options.input.display().to_string();
    let mut artifacts = Artifacts::create(&options.output, &options.input)?;

    let tokens = crate::tokenize(&file, &source)?;
    if options.intermediate {
        artifacts.write("tokens.json", &serde_json::to_string_pretty(&tokens)?)?;
    }

    let ast = crate::parse(tokens)?;
    if options.intermediate {
        artifacts.write("ast-pre-sa.json", &serde_json::to_string_pretty(&ast)?)?;
        artifacts.write("ast-pre-sa.txt", &ast.to_string())?;
    }

    let mut analyzer = Analyzer::new();
    let analysis = match analyzer.analyze(ast) {
        Ok(analysis) => analysis,
        Err(error) if analyzer.warnings().is_empty() => return Err(error),
        Err(error) => {
            return Err(Error::WithWarnings {
                error: Box::new(error),
                warnings: analyzer.warnings().to_vec(),
            })
        }
    };
    if options.intermediate {
        artifacts.write("ast-post-sa.json", &serde_json::to_string_pretty(&analysis.ast)?)?;
        let tables = ScopeTables {
            globals: &analysis.globals,
            scopes: &analysis.scopes,
        };
        artifacts.write("scopes.yaml", &serde_yaml::to_string(&tables)?)?;
    }

    let assembly = Generator::new().generate(&analysis.ast);
    artifacts.write("s", &assembly.render())?;

    Ok(Output {
        assembly,
        warnings: analysis.warnings,
        artifacts: artifacts.written,
    })
}
