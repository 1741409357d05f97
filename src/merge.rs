//! Joining already exported PostScript pages into one document.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::info;

use crate::error::{ExhibitError, Result};

/// Concatenate PostScript files byte for byte, in order, into `output`.
///
/// The result is meant for a PostScript interpreter such as `ps2pdf`. An
/// empty input list is an error; the output is not created in that case.
pub fn concat_ps<P: AsRef<Path>, Q: AsRef<Path>>(inputs: &[P], output: Q) -> Result<()> {
    if inputs.is_empty() {
        return Err(ExhibitError::InvalidArgument(
            "no PostScript files to concatenate".into(),
        ));
    }
    let output = output.as_ref();
    let mut out = BufWriter::new(File::create(output)?);
    let mut total = 0u64;
    for input in inputs {
        let mut src = File::open(input.as_ref())?;
        total += io::copy(&mut src, &mut out)?;
    }
    out.flush()?;
    info!(
        "concatenated {} files ({total} bytes) into {}",
        inputs.len(),
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn pages_are_joined_in_order() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.ps");
        let b = dir.path().join("b.ps");
        std::fs::write(&a, b"%!PS\npage one\n").unwrap();
        std::fs::write(&b, b"%!PS\npage two\n").unwrap();
        let out = dir.path().join("all.ps");
        concat_ps(&[&a, &b], &out).unwrap();
        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "%!PS\npage one\n%!PS\npage two\n"
        );
    }

    #[test]
    fn empty_input_is_rejected() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("none.ps");
        let inputs: [&Path; 0] = [];
        assert!(concat_ps(&inputs, &out).is_err());
        assert!(!out.exists());
    }
}
