//! Command handlers
//!
//! Each handler returns `Ok(false)` when it already reported a failure to the user and only
//! the exit status is left to set.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use unpick::unpick::loader::DslLoader;
use unpick::unpick::{write_tree, LoaderError, Mappings, Remapper, Tree, UnpickError};
use unpick_config::{ConfigError, Loader, UnpickConfig};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Unpick(#[from] UnpickError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub fn load_config(path: Option<&Path>) -> Result<UnpickConfig, CliError> {
    let loader = match path {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new(),
    };
    Ok(loader.build()?)
}

pub fn check(files: &[PathBuf]) -> Result<bool, CliError> {
    let mut clean = true;
    for file in files {
        let loader = match DslLoader::from_path(file) {
            Ok(loader) => loader,
            Err(error) => {
                eprintln!("error: {}", error);
                clean = false;
                continue;
            }
        };
        match loader.parse() {
            Ok(tree) => println!("{}: ok ({} items)", loader.origin(), tree.items.len()),
            Err(error) => {
                eprintln!("error: {}", error);
                if let LoaderError::Parse { error, .. } = &error {
                    eprint!("{}", loader.context(error));
                }
                clean = false;
            }
        }
    }
    Ok(clean)
}

fn read_tree(file: &Path) -> unpick::unpick::Result<Tree> {
    Ok(DslLoader::from_path(file)?.parse()?)
}

pub fn format(file: &Path, in_place: bool, config: &UnpickConfig) -> Result<bool, CliError> {
    let tree = read_tree(file)?;
    let text = write_tree(&tree, &config.writer);

    if in_place {
        fs::write(file, &text).map_err(|source| CliError::Write {
            path: file.display().to_string(),
            source,
        })?;
        info!(file = %file.display(), "formatted in place");
    } else {
        print!("{}", text);
    }
    Ok(true)
}

pub fn remap(file: &Path, mappings: &Path, config: &UnpickConfig) -> Result<bool, CliError> {
    let tree = read_tree(file)?;
    let mappings = Mappings::from_path(mappings).map_err(UnpickError::from)?;
    let remapped = Remapper::new(&mappings).remap_tree(&tree);
    print!("{}", write_tree(&remapped, &config.writer));
    Ok(true)
}
