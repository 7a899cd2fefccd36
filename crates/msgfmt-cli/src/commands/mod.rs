//! CLI command implementations.

mod format;
mod inspect;
mod pack;

use std::fs::{read_to_string, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use miette::{miette, IntoDiagnostic, WrapErr};
use msgfmt::MessageSupport;
use tracing::debug;

use crate::definitions::Definitions;
use crate::output::diagnostic::JsonDiagnostic;

pub use format::{run_format, FormatArgs};
pub use inspect::{run_inspect, InspectArgs};
pub use pack::{run_pack, PackArgs};

/// Parse a JSON definitions file into a support holding its messages.
pub(crate) fn load_definitions(path: &Path) -> miette::Result<MessageSupport> {
    let content = read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("cannot read {}", path.display()))?;
    let definitions: Definitions = serde_json::from_str(&content)
        .map_err(|e| JsonDiagnostic::from_json_error(path, &content, &e))?;
    let support = definitions
        .into_support()
        .map_err(|e| miette!("{}: {e}", path.display()))?;
    debug!(path = %path.display(), "loaded definitions");
    Ok(support)
}

/// Add the contents of each pack file to `support`.
pub(crate) fn import_packs(support: &mut MessageSupport, paths: &[PathBuf]) -> miette::Result<()> {
    for path in paths {
        let file = File::open(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("cannot open {}", path.display()))?;
        let count = support
            .import_messages([BufReader::new(file)])
            .map_err(|e| miette!("{}: {e}", path.display()))?;
        debug!(path = %path.display(), messages = count, "imported pack");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    const DEFINITIONS: &str = r#"{
        "templates": { "sig": { "kind": "text", "text": "-- ops" } },
        "messages": [ { "code": "bye", "node": { "kind": "compound", "parts": [
            { "kind": "parameter", "name": "who", "space_after": true },
            { "kind": "template", "name": "sig" } ] } } ]
    }"#;

    fn definitions_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn definitions_survive_a_pack_file() {
        let defs = definitions_file(DEFINITIONS);
        let support = load_definitions(defs.path()).unwrap();

        let pack = NamedTempFile::new().unwrap();
        support.export_all_messages(pack.as_file()).unwrap();

        let mut imported = MessageSupport::new();
        import_packs(&mut imported, &[pack.path().to_path_buf()]).unwrap();
        assert!(imported.has_template("sig"));
        let text = imported.code("bye").unwrap().with("who", "Bye").format().unwrap();
        assert_eq!(text, "Bye -- ops");
    }

    #[test]
    fn malformed_definitions_point_at_the_error() {
        let defs = definitions_file("{ \"messages\": [ { \"code\": 1 } ] }");
        let err = load_definitions(defs.path()).unwrap_err();
        assert!(err.to_string().starts_with("invalid definitions:"), "{err}");
    }

    #[test]
    fn missing_packs_are_reported() {
        let mut support = MessageSupport::new();
        let err = import_packs(&mut support, &[PathBuf::from("/nonexistent/x.pack")]).unwrap_err();
        assert!(err.to_string().starts_with("cannot open"), "{err}");
    }
}
