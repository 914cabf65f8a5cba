use std::path::PathBuf;

use anyhow::{Result, bail};

pub const USAGE: &str = "usage: cluster [--config FILE] BACKGROUND SCENE";

#[derive(Debug, PartialEq)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub background: PathBuf,
    pub scene: PathBuf,
}

impl Args {
    /// Parses arguments without the program name.
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = None;
        let mut positional = Vec::new();

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => match args.next() {
                    Some(path) => config = Some(PathBuf::from(path)),
                    None => bail!("--config needs a file\n{}", USAGE),
                },
                flag if flag.starts_with('-') => bail!("unknown option {}\n{}", flag, USAGE),
                _ => positional.push(PathBuf::from(arg)),
            }
        }

        let [background, scene]: [PathBuf; 2] = match positional.try_into() {
            Ok(paths) => paths,
            Err(_) => bail!("expected BACKGROUND and SCENE\n{}", USAGE),
        };

        Ok(Self {
            config,
            background,
            scene,
        })
    }
}
