//! Implementation of the `fledge list` command.

use std::sync::Arc;

use fledge_adapters::LocalFilesystem;
use fledge_core::application::RendererInfo;

use crate::{
    cli::{ListArgs, ListFormat, OutputFormat},
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, output: OutputManager) -> CliResult<()> {
    let service = super::base_service(Arc::new(LocalFilesystem::new()));
    let renderers = service.list_renderers();

    // The global JSON mode wins over the per-command format.
    let format = if output.format() == OutputFormat::Json {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Table => {
            output.header("Available renderers:")?;
            for line in table(&renderers) {
                output.print(&line)?;
            }
        }
        ListFormat::List => {
            for renderer in &renderers {
                output.print(&renderer.name)?;
            }
        }
        // Bypasses quiet mode so pipes always get parseable output.
        ListFormat::Json => output.json(&renderers)?,
    }

    Ok(())
}

/// Name, selection target and description, with the name column padded to
/// the longest name.
fn table(renderers: &[RendererInfo]) -> Vec<String> {
    let width = renderers.iter().map(|r| r.name.len()).max().unwrap_or(0);
    renderers
        .iter()
        .map(|r| {
            let target = match (&r.platform, &r.state_management) {
                (Some(platform), Some(state)) => format!("{platform} + {state}"),
                _ => "any platforms".to_string(),
            };
            format!("  {:<width$}  {:<20}  {}", r.name, target, r.description)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(name: &str, platform: Option<&str>, state: Option<&str>) -> RendererInfo {
        RendererInfo {
            name: name.into(),
            description: format!("{name} description"),
            platform: platform.map(Into::into),
            state_management: state.map(Into::into),
        }
    }

    #[test]
    fn table_aligns_names_and_shows_targets() {
        let rows = table(&[
            info("mobile-provider", Some("mobile"), Some("provider")),
            info("universal", None, None),
        ]);

        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains("mobile + provider"));
        assert!(rows[1].contains("any platforms"));
        let desc_col = |row: &str, name: &str| row.find(&format!("{name} description")).unwrap();
        assert_eq!(
            desc_col(&rows[0], "mobile-provider"),
            desc_col(&rows[1], "universal")
        );
    }

    #[test]
    fn builtin_catalog_is_listed() {
        let service = crate::commands::base_service(Arc::new(LocalFilesystem::new()));
        let names: Vec<String> = service.list_renderers().into_iter().map(|r| r.name).collect();

        assert!(names.contains(&"universal".to_string()));
        assert!(names.contains(&"desktop-getx".to_string()));
        assert_eq!(names.len(), 13);
    }
}
