mod bootstrap;

use std::path::Path;

use anyhow::{Context, Result};
use report_core::settings::Settings;
use report_data::analysis::{analyze_file, Analysis};
use report_ui::app::App;
use report_ui::text_view;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.tracing_level())?;

    tracing::info!("Retail Report v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Data: {}, View: {}, Theme: {}",
        settings.data.display(),
        settings.view,
        settings.theme
    );

    let analysis = load_analysis(&settings.data)?;

    match render_static(&settings.view, &analysis)? {
        Some(output) => print!("{}", output),
        None => {
            tracing::info!("Starting dashboard...");
            App::new(&settings.theme, settings.min_quantity).run_dashboard(&analysis)?;
        }
    }

    Ok(())
}

fn load_analysis(path: &Path) -> Result<Analysis> {
    analyze_file(path).with_context(|| format!("Failed to build report from {}", path.display()))
}

/// Render the non-interactive views; `None` means the dashboard was asked for.
fn render_static(view: &str, analysis: &Analysis) -> Result<Option<String>> {
    match view {
        "text" => Ok(Some(text_view::render_report(&analysis.report))),
        "json" => {
            let mut json = analysis.report.to_json()?;
            json.push('\n');
            Ok(Some(json))
        }
        _ => Ok(None),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use report_core::error::ReportError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CSV: &str = "\
InvoiceNo,StockCode,Description,Quantity,InvoiceDate,UnitPrice,CustomerID,Country
536365,85123A,WHITE HANGING HEART T-LIGHT HOLDER,6,12/1/2010 8:26,2.55,17850,United Kingdom
536367,84879,ASSORTED COLOUR BIRD ORNAMENT,32,1/4/2011 10:05,1.69,13047,France
536369,POST,POSTAGE,3,1/4/2011 12:15,18,12583,France
C536379,22556,PLASTERS IN TIN CIRCUS PARADE,-12,12/1/2010 9:41,1.65,14527,United Kingdom
";

    fn analysis_from_file() -> Analysis {
        let mut file = NamedTempFile::new().expect("tempfile");
        file.write_all(CSV.as_bytes()).expect("write");
        analyze_file(file.path()).expect("analysis")
    }

    #[test]
    fn test_json_view_is_valid_json() {
        let analysis = analysis_from_file();
        let output = render_static("json", &analysis).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["metadata"]["rows_clean"], 3);
        assert_eq!(value["top_countries"][0]["country"], "France");
    }

    #[test]
    fn test_text_view_lists_tables() {
        let analysis = analysis_from_file();
        let output = render_static("text", &analysis).unwrap().unwrap();
        assert!(output.contains("Top 10 Revenue by Country"));
        assert!(output.contains("France"));
        assert!(!output.contains("POSTAGE"));
    }

    #[test]
    fn test_dashboard_view_is_not_static() {
        let analysis = analysis_from_file();
        assert!(render_static("dashboard", &analysis).unwrap().is_none());
    }

    #[test]
    fn test_missing_file_error_names_path() {
        let err = load_analysis(Path::new("/nonexistent/orders.csv")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to build report from /nonexistent/orders.csv"
        );
        assert!(matches!(
            err.downcast_ref::<ReportError>(),
            Some(ReportError::FileRead { .. })
        ));
    }

    #[test]
    fn test_load_analysis_reads_file() {
        let mut file = NamedTempFile::new().expect("tempfile");
        file.write_all(CSV.as_bytes()).expect("write");
        let analysis = load_analysis(file.path()).unwrap();
        assert_eq!(analysis.clean.len(), 3);
    }
}
