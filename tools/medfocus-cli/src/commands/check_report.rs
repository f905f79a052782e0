//! Validate medical report input.

use std::path::PathBuf;

use medfocus_report::pdf::check_signature;
use medfocus_report::{Language, ReportInput, UploadedFile, PDF_MIME_TYPE};

pub fn run(text: Option<PathBuf>, pdf: Option<PathBuf>, language: &str) -> anyhow::Result<()> {
    let language = language
        .parse::<Language>()
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    let report_text = text.map(std::fs::read_to_string).transpose()?;
    let file = match pdf {
        Some(path) => {
            let bytes = std::fs::read(&path)?;
            let is_pdf = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
            let mime = if is_pdf {
                PDF_MIME_TYPE
            } else {
                "application/octet-stream"
            };
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Some(UploadedFile::new(name, mime, bytes))
        }
        None => None,
    };

    let input = ReportInput {
        report_text,
        file,
        language,
    };

    println!("Report input check ({})", language.display_name());
    println!("{}", "=".repeat(50));

    let mut ok = true;
    match input.validate() {
        Ok(()) => {
            if let Some(text) = input.text() {
                println!("[OK] report_text: {} characters", text.chars().count());
            }
            if let Some(file) = &input.file {
                println!("[OK] file: {} ({} bytes)", file.name, file.size());
            }
        }
        Err(errors) => {
            ok = false;
            for e in errors {
                println!("[FAIL] {}: {}", e.field, e.message);
            }
        }
    }

    if let Some(file) = input.file.as_ref().filter(|f| f.size() > 0) {
        match check_signature(&file.bytes) {
            Ok(()) => println!("[OK] file: PDF signature present"),
            Err(e) => {
                ok = false;
                println!("[FAIL] file: {}", e.user_message());
            }
        }
    }

    println!();
    if ok {
        println!("Input is ready to be summarized.");
        Ok(())
    } else {
        anyhow::bail!("report input is invalid")
    }
}
