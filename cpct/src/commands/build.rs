//! `cpct build`: run the full pipeline over one or more source files and
//! write the generated Go source.

use std::path::{Path, PathBuf};

use cpc_drv::{compile_file, CompileOutput, Config};

use crate::error::{CliError, Result};

pub struct BuildArgs {
    pub inputs: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub search_dirs: Vec<PathBuf>,
    pub defines: Vec<(String, String)>,
    pub verbose: bool,
}

pub fn run_build(args: BuildArgs) -> Result<()> {
    if args.inputs.len() > 1 && args.output.as_deref().is_some_and(Path::is_file) {
        return Err(CliError::OutputPathAmbiguous);
    }

    let mut config = Config::new();
    config.search_dirs = args.search_dirs;
    config.verbose = args.verbose;
    for (key, value) in args.defines {
        config.defines.insert(key, value);
    }

    for input in &args.inputs {
        tracing::debug!(file = %input.display(), "compiling");
        let output = compile_file(&config, input)?;
        write_output(&args.output, input, args.inputs.len(), &output)?;
    }

    Ok(())
}

fn write_output(
    requested: &Option<PathBuf>,
    input: &Path,
    input_count: usize,
    output: &CompileOutput,
) -> Result<()> {
    match requested {
        None if input_count == 1 => {
            print!("{}", output.go_source);
            Ok(())
        }
        None => {
            let path = input.with_extension("go");
            std::fs::write(&path, &output.go_source)?;
            Ok(())
        }
        Some(path) if input_count == 1 => {
            std::fs::write(path, &output.go_source)?;
            Ok(())
        }
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let name = input.file_stem().unwrap_or_default();
            let path = dir.join(name).with_extension("go");
            std::fs::write(&path, &output.go_source)?;
            Ok(())
        }
    }
}
