use super::{json_pretty, mark_fail, mark_ok, or_dash, EXIT_SUCCESS};
use bundlekit_schema::{BundleFormat, UnitPlacement};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct PlacementReport<'a> {
    placement: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<UnitPlacement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn run(directives: &[String], format: BundleFormat, json: bool) -> Result<u8, String> {
    let reports: Vec<PlacementReport<'_>> = directives
        .iter()
        .map(|raw| {
            let parsed = format.parse_placement(raw);
            tracing::trace!(placement = %raw, %format, ok = parsed.is_ok(), "parsed placement");
            match parsed {
                Ok(placement) => PlacementReport {
                    placement: raw,
                    result: Some(placement),
                    error: None,
                },
                Err(e) => PlacementReport {
                    placement: raw,
                    result: None,
                    error: Some(e.to_string()),
                },
            }
        })
        .collect();

    if json {
        println!("{}", json_pretty(&reports)?);
    } else {
        for report in &reports {
            if let Some(p) = &report.result {
                let index = p.unit_index.map_or_else(|| "-".to_owned(), |i| i.to_string());
                println!(
                    "{}",
                    mark_ok(&format!(
                        "{:?}  container={} machine={} unit={} index={index}",
                        report.placement,
                        or_dash(&p.container),
                        or_dash(&p.machine),
                        or_dash(&p.unit),
                    ))
                );
            }
            if let Some(e) = &report.error {
                eprintln!("{}", mark_fail(&format!("{:?}: {e}", report.placement)));
            }
        }
    }

    let failed = reports.iter().filter(|r| r.error.is_some()).count();
    if failed > 0 {
        return Err(format!(
            "validation error: {failed} of {} {format} placements invalid",
            reports.len()
        ));
    }
    Ok(EXIT_SUCCESS)
}
