//! Resolving where each input should be converted to.
//!
//! Everything here runs before any conversion starts, so that a bad
//! invocation never partially processes a batch.

use core::error::Error;
use core::fmt;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::bitrate::Bitrate;
use crate::format::Format;

/// An invalid combination of inputs and output.
#[derive(Debug, PartialEq, Eq)]
pub enum ValidationError {
    OutputIsFile(PathBuf),
    OutputDirMissing(PathBuf),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutputIsFile(path) => write!(
                f,
                "Output path \"{}\" is a file. When processing multiple files, output must be a directory.",
                path.display()
            ),
            Self::OutputDirMissing(path) => write!(
                f,
                "Output directory \"{}\" does not exist. Please create it first.",
                path.display()
            ),
        }
    }
}

impl Error for ValidationError {}

/// Where converted files are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Next to each input file.
    Alongside,
    /// Inside of an existing directory.
    Directory(PathBuf),
    /// Exactly this path. Only valid for a single input.
    File(PathBuf),
}

impl Target {
    /// Classify the output option given the number of inputs.
    pub fn resolve(output: Option<&Path>, count: usize) -> Result<Self, ValidationError> {
        let Some(output) = output else {
            return Ok(Target::Alongside);
        };

        if output.is_dir() {
            return Ok(Target::Directory(output.to_owned()));
        }

        if count > 1 {
            if output.exists() {
                return Err(ValidationError::OutputIsFile(output.to_owned()));
            }

            return Err(ValidationError::OutputDirMissing(output.to_owned()));
        }

        Ok(Target::File(output.to_owned()))
    }

    /// Compute the output path for a single input.
    ///
    /// Returns `None` if the input has no file name to derive an output name
    /// from, like `..` or `/`.
    pub fn output_for(&self, input: &Path, format: &Format) -> Option<PathBuf> {
        match self {
            Target::Alongside => {
                input.file_name()?;
                Some(input.with_extension(format.ext()))
            }
            Target::Directory(dir) => {
                let mut name = input.file_stem()?.to_owned();
                name.push(".");
                name.push(format.ext());
                Some(dir.join(name))
            }
            Target::File(path) => Some(path.clone()),
        }
    }
}

/// A single planned conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub input: PathBuf,
    /// Where the input is converted to, or `None` if no output could be
    /// derived from it.
    pub output: Option<PathBuf>,
    pub format: Format,
    pub bitrate: Option<Bitrate>,
}

/// More than one input maps to the same output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub output: PathBuf,
    pub inputs: Vec<PathBuf>,
}

/// The validated plan for a batch.
#[derive(Debug)]
pub struct Plan {
    pub target: Target,
    pub requests: Vec<Request>,
    pub collisions: Vec<Collision>,
}

/// Validate the output option and compute one request per input, in input
/// order.
pub fn plan(
    inputs: &[PathBuf],
    output: Option<&Path>,
    format: &Format,
    bitrate: Option<&Bitrate>,
) -> Result<Plan, ValidationError> {
    let target = Target::resolve(output, inputs.len())?;

    let mut requests = Vec::with_capacity(inputs.len());

    for input in inputs {
        requests.push(Request {
            input: input.clone(),
            output: target.output_for(input, format),
            format: format.clone(),
            bitrate: bitrate.cloned(),
        });
    }

    let collisions = collisions(&requests);

    Ok(Plan {
        target,
        requests,
        collisions,
    })
}

/// Group requests writing to the same output, in first-seen order.
fn collisions(requests: &[Request]) -> Vec<Collision> {
    let mut index = HashMap::<&Path, usize>::new();
    let mut groups = Vec::<(&Path, Vec<&Path>)>::new();

    for r in requests {
        let Some(output) = r.output.as_deref() else {
            continue;
        };

        let n = *index.entry(output).or_insert_with(|| {
            groups.push((output, Vec::new()));
            groups.len() - 1
        });

        groups[n].1.push(r.input.as_path());
    }

    groups
        .into_iter()
        .filter(|(_, inputs)| inputs.len() > 1)
        .map(|(output, inputs)| Collision {
            output: output.to_owned(),
            inputs: inputs.into_iter().map(Path::to_owned).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use tempfile::TempDir;

    use super::{Target, ValidationError, plan};
    use crate::bitrate::Bitrate;
    use crate::format::Format;

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    fn outputs(plan: &super::Plan) -> Vec<PathBuf> {
        plan.requests.iter().filter_map(|r| r.output.clone()).collect()
    }

    #[test]
    fn alongside_replaces_extension() {
        let format = Format::default();
        let plan = plan(&paths(&["a.wav", "music/b.flac", "c"]), None, &format, None).unwrap();

        assert_eq!(plan.target, Target::Alongside);
        assert_eq!(outputs(&plan), paths(&["a.mp3", "music/b.mp3", "c.mp3"]));
        assert!(plan.collisions.is_empty());
        assert!(plan.requests.iter().all(|r| r.bitrate.is_none()));
    }

    #[test]
    fn alongside_keeps_inner_dots() {
        let format = "ogg".parse().unwrap();
        let plan = plan(&paths(&["live.2019.wav"]), None, &format, None).unwrap();
        assert_eq!(outputs(&plan), paths(&["live.2019.ogg"]));
    }

    #[test]
    fn directory_uses_base_name() {
        let dir = TempDir::new().unwrap();
        let format = "ogg".parse().unwrap();

        let plan = plan(
            &paths(&["x/one.wav", "two.tar.flac", "/abs/three"]),
            Some(dir.path()),
            &format,
            None,
        )
        .unwrap();

        assert_eq!(plan.target, Target::Directory(dir.path().to_owned()));
        assert_eq!(
            outputs(&plan),
            vec![
                dir.path().join("one.ogg"),
                dir.path().join("two.tar.ogg"),
                dir.path().join("three.ogg"),
            ]
        );
    }

    #[test]
    fn directory_with_single_input() {
        let dir = TempDir::new().unwrap();
        let plan = plan(&paths(&["a.wav"]), Some(dir.path()), &Format::default(), None).unwrap();
        assert_eq!(outputs(&plan), vec![dir.path().join("a.mp3")]);
    }

    #[test]
    fn single_input_to_literal_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.mp3");
        let bitrate = "128k".parse::<Bitrate>().unwrap();

        let plan = plan(&paths(&["a.wav"]), Some(&out), &Format::default(), Some(&bitrate)).unwrap();

        assert_eq!(plan.target, Target::File(out.clone()));
        assert_eq!(plan.requests.len(), 1);
        assert_eq!(plan.requests[0].output.as_ref(), Some(&out));
        assert_eq!(plan.requests[0].bitrate, Some(bitrate));
    }

    #[test]
    fn single_input_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("existing.mp3");
        fs::write(&out, b"old").unwrap();

        let plan = plan(&paths(&["a.wav"]), Some(&out), &Format::default(), None).unwrap();
        assert_eq!(outputs(&plan), vec![out]);
    }

    #[test]
    fn many_inputs_to_file_fails() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("existing.mp3");
        fs::write(&out, b"old").unwrap();

        let err = plan(&paths(&["a.wav", "b.wav"]), Some(&out), &Format::default(), None)
            .unwrap_err();

        assert_eq!(err, ValidationError::OutputIsFile(out));
        assert!(err.to_string().contains("is a file"));
    }

    #[test]
    fn many_inputs_to_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missingdir");

        let err = plan(&paths(&["a.wav", "b.wav"]), Some(&missing), &Format::default(), None)
            .unwrap_err();

        assert_eq!(err, ValidationError::OutputDirMissing(missing));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn no_file_name_is_kept_in_plan() {
        let dir = TempDir::new().unwrap();

        let plan = plan(
            &paths(&["a.wav", "..", "b.wav"]),
            Some(dir.path()),
            &Format::default(),
            None,
        )
        .unwrap();

        assert_eq!(plan.requests.len(), 3);
        assert_eq!(plan.requests[0].output, Some(dir.path().join("a.mp3")));
        assert_eq!(plan.requests[1].input, Path::new(".."));
        assert_eq!(plan.requests[1].output, None);
        assert_eq!(plan.requests[2].output, Some(dir.path().join("b.mp3")));
        assert!(plan.collisions.is_empty());

        let plan = super::plan(&paths(&["/", ".."]), None, &Format::default(), None).unwrap();
        assert!(plan.requests.iter().all(|r| r.output.is_none()));
        assert!(plan.collisions.is_empty());
    }

    #[test]
    fn collisions_are_collected() {
        let dir = TempDir::new().unwrap();

        let plan = plan(
            &paths(&["a/x.wav", "b.wav", "b/x.flac"]),
            Some(dir.path()),
            &Format::default(),
            None,
        )
        .unwrap();

        assert_eq!(plan.requests.len(), 3);
        assert_eq!(plan.collisions.len(), 1);

        let c = &plan.collisions[0];
        assert_eq!(c.output, dir.path().join("x.mp3"));
        assert_eq!(c.inputs, paths(&["a/x.wav", "b/x.flac"]));
    }

    #[test]
    fn alongside_collision() {
        let plan = plan(&paths(&["x.wav", "x.flac"]), None, &Format::default(), None).unwrap();
        assert_eq!(plan.collisions.len(), 1);
        assert_eq!(plan.collisions[0].output, Path::new("x.mp3"));
    }
}
