//! Document security: encrypt, decrypt, strip metadata.
//!
//! Encryption is delegated wholesale to the external `qpdf` tool (AES-256);
//! this module only shapes arguments and relays failures. Metadata
//! stripping rewrites the trailer's Info reference with lopdf.

use std::path::Path;

use crate::config::Credentials;
use crate::error::{ForgeError, Result};
use crate::io::{PdfReader, PdfWriter};
use crate::runner::ProgressSink;
use crate::utils::run_tool;

const QPDF_HINT: &str = "install qpdf (e.g. 'apt install qpdf' or 'brew install qpdf')";

/// Encrypt `input` with AES-256 using the given credentials.
pub async fn encrypt(
    input: &Path,
    output: &Path,
    credentials: &Credentials,
    progress: &ProgressSink,
) -> Result<String> {
    credentials.validate()?;

    if !input.exists() {
        return Err(ForgeError::file_not_found(input.to_path_buf()));
    }

    progress.set(20);

    let input_str = input.to_string_lossy().into_owned();
    let output_str = output.to_string_lossy().into_owned();

    run_tool(
        "qpdf",
        &[
            "--encrypt",
            &credentials.password,
            credentials.owner(),
            "256",
            "--",
            &input_str,
            &output_str,
        ],
        QPDF_HINT,
    )
    .await?;

    progress.set(90);

    Ok(format!("Encrypted, saved to {}", output.display()))
}

/// Remove encryption from `input`, authenticating with `password`.
///
/// A wrong password surfaces as the tool's failure message; there is no
/// retry.
pub async fn decrypt(
    input: &Path,
    output: &Path,
    password: &str,
    progress: &ProgressSink,
) -> Result<String> {
    if !input.exists() {
        return Err(ForgeError::file_not_found(input.to_path_buf()));
    }

    progress.set(20);

    let password_arg = format!("--password={password}");
    let input_str = input.to_string_lossy().into_owned();
    let output_str = output.to_string_lossy().into_owned();

    run_tool(
        "qpdf",
        &[&password_arg, "--decrypt", &input_str, &output_str],
        QPDF_HINT,
    )
    .await?;

    progress.set(90);

    Ok(format!("Decrypted, saved to {}", output.display()))
}

/// Remove the document information dictionary (author, producer, etc.).
pub async fn strip_metadata(
    input: &Path,
    output: &Path,
    progress: &ProgressSink,
) -> Result<String> {
    let loaded = PdfReader::new().load(input).await?;
    let mut doc = loaded.document;

    progress.set(30);

    // Drop the Info object itself when it is referenced indirectly, then
    // the trailer entry.
    if let Ok(info_ref) = doc.trailer.get(b"Info").and_then(|o| o.as_reference()) {
        doc.objects.remove(&info_ref);
    }
    doc.trailer.remove(b"Info");

    progress.set(70);

    PdfWriter::new().save(&doc, output).await?;

    Ok(format!("Metadata removed, saved to {}", output.display()))
}
