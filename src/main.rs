extern crate log;
pub mod assemble;
pub mod console_control;
pub mod coord;
pub mod geofile;
pub mod geomap;
pub mod grouping;
pub mod pipeline;
pub mod polyline;
use crate::console_control::{read_console_control_file, render_report};
use crate::geofile::writer::{recreate_dir, write_outputs};
use crate::geomap::{read_geomaps_file, InvalidRecordPolicy, MenuIndex};
use crate::grouping::GroupingStrategy;
use crate::pipeline::{convert_geomaps, ConvertOptions};
use anyhow::{anyhow, Context};
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::{fs, fs::read_to_string, path::Path};

const GEOMAPS_FILE_NAME: &str = "Geomaps.xml";
const CONSOLE_CONTROL_FILE_NAME: &str = "ConsoleCommandControl.xml";
const CONSOLE_CONTROL_REPORT_FILE_NAME: &str = "ConsoleCommandControl.txt";
const OUTPUT_DIR_NAME: &str = "geojson_output";

/// Convert geomap XML into GeoJSON feature collections.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input config file.
    #[arg(short, long)]
    config_filepath: String,
    /// Overrides `output_format` from the config file.
    #[arg(short, long, value_enum)]
    output_format: Option<GroupingStrategy>,
}

#[derive(Deserialize, Debug)]
struct Config {
    source_dir: PathBuf,
    output_dir: PathBuf,
    #[serde(default)]
    output_format: GroupingStrategy,
    #[serde(default)]
    include_custom_properties: bool,
    #[serde(default)]
    invalid_records: InvalidRecordPolicy,
}

fn write_console_control_report(
    source_filepath: &Path,
    output_root: &Path,
    menu_index: &MenuIndex,
) -> anyhow::Result<()> {
    log::info!("Parsing {:?}", source_filepath);
    let records = read_console_control_file(source_filepath)
        .with_context(|| format!("Reading {:?}", source_filepath))?;
    let report_filepath = output_root.join(CONSOLE_CONTROL_REPORT_FILE_NAME);
    log::info!(
        "Writing {} brightness and {} filter menus to {:?}",
        records.brightness_menus.len(),
        records.filter_menus.len(),
        report_filepath
    );
    fs::write(&report_filepath, render_report(&records, menu_index))
        .with_context(|| format!("Writing {:?}", report_filepath))
}

fn run(config: &Config) -> anyhow::Result<()> {
    let geomaps_filepath = config.source_dir.join(GEOMAPS_FILE_NAME);
    if !geomaps_filepath.exists() {
        return Err(anyhow!("Geomap file {:?} not found", geomaps_filepath));
    }
    log::info!("Parsing {:?}", geomaps_filepath);
    let raw_geomaps = read_geomaps_file(&geomaps_filepath)
        .with_context(|| format!("Reading {:?}", geomaps_filepath))?;
    log::info!("Read {} geomaps", raw_geomaps.len());
    let menu_index = MenuIndex::from_geomaps(&raw_geomaps);

    let options = ConvertOptions {
        strategy: config.output_format,
        include_custom_properties: config.include_custom_properties,
        invalid_records: config.invalid_records,
    };
    log::info!("Grouping features by {:?}", options.strategy);
    let outputs = convert_geomaps(&raw_geomaps, &options)?;
    log::info!(
        "Assembled {} features in {} groups",
        outputs.iter().map(|o| o.feature_count()).sum::<usize>(),
        outputs.iter().map(|o| o.groups.len()).sum::<usize>()
    );

    let output_root = config.output_dir.join(OUTPUT_DIR_NAME);
    recreate_dir(&output_root)?;
    let written = write_outputs(&output_root, &outputs)?;
    log::info!("Wrote {} GeoJSON files to {:?}", written, output_root);

    let console_control_filepath = config.source_dir.join(CONSOLE_CONTROL_FILE_NAME);
    if console_control_filepath.exists() {
        write_console_control_report(&console_control_filepath, &output_root, &menu_index)?;
    } else {
        log::info!(
            "No {} in {:?}, skipping the menu report",
            CONSOLE_CONTROL_FILE_NAME,
            config.source_dir
        );
    }
    Ok(())
}

fn try_main() -> anyhow::Result<()> {
    let args = Args::try_parse()?;
    if !Path::new(&args.config_filepath).exists() {
        return Err(anyhow!("Config file {} not found", &args.config_filepath));
    }
    let config_contents = read_to_string(args.config_filepath)?;
    let mut config: Config = serde_yaml::from_str(&config_contents)?;
    if let Some(output_format) = args.output_format {
        config.output_format = output_format;
    }
    run(&config)
}

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    env_logger::init();
    if let Err(e) = try_main() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use testdir::testdir;

    use crate::geomap::InvalidRecordPolicy;
    use crate::grouping::GroupingStrategy;

    use super::{run, Config};

    #[rstest]
    fn test_config_defaults() {
        let config: Config =
            serde_yaml::from_str("source_dir: /data/in\noutput_dir: /data/out\n").unwrap();
        assert_eq!(config.output_format, GroupingStrategy::Filters);
        assert!(!config.include_custom_properties);
        assert_eq!(config.invalid_records, InvalidRecordPolicy::Abort);
    }

    #[rstest]
    fn test_config_explicit_values() {
        let config: Config = serde_yaml::from_str(
            "source_dir: in\noutput_dir: out\noutput_format: attributes\ninclude_custom_properties: true\ninvalid_records: skip\n",
        )
        .unwrap();
        assert_eq!(config.output_format, GroupingStrategy::Attributes);
        assert!(config.include_custom_properties);
        assert_eq!(config.invalid_records, InvalidRecordPolicy::Skip);
    }

    #[rstest]
    fn test_run_writes_geojson_and_report() {
        let test_dir = testdir!();
        let source_dir = test_dir.join("source");
        fs::create_dir_all(&source_dir).unwrap();
        fs::write(
            source_dir.join("Geomaps.xml"),
            r#"<GeoMapSet><GeoMapRecord>
                <GeomapId>APP</GeomapId>
                <BCGMenuName>App BCG</BCGMenuName>
                <FilterMenuName>App Filters</FilterMenuName>
                <GeoMapObjectType>
                  <MapObjectType>Fix</MapObjectType>
                  <MapGroupId>3</MapGroupId>
                  <GeoMapSymbol>
                    <SymbolId>DTW</SymbolId>
                    <Latitude>421247.00N</Latitude>
                    <Longitude>0831234.00W</Longitude>
                  </GeoMapSymbol>
                </GeoMapObjectType>
              </GeoMapRecord></GeoMapSet>"#,
        )
        .unwrap();
        fs::write(
            source_dir.join("ConsoleCommandControl.xml"),
            "<ConsoleCommandControl_Records><MapBrightnessMenu><BCGMenuName>App BCG</BCGMenuName></MapBrightnessMenu></ConsoleCommandControl_Records>",
        )
        .unwrap();
        let config = Config {
            source_dir,
            output_dir: test_dir.clone(),
            output_format: GroupingStrategy::Filters,
            include_custom_properties: false,
            invalid_records: InvalidRecordPolicy::Abort,
        };

        run(&config).unwrap();

        let output_root = test_dir.join("geojson_output");
        assert!(output_root
            .join("APP_LL1-LL2/Filter_00/Filter_00_Symbols.geojson")
            .is_file());
        let report = fs::read_to_string(output_root.join("ConsoleCommandControl.txt")).unwrap();
        assert!(report.contains("BCG Menu: App BCG\n\n\tUsed with:\tAPP\n"));
    }

    #[rstest]
    fn test_run_requires_geomaps_file() {
        let test_dir = testdir!();
        let config = Config {
            source_dir: test_dir.join("missing"),
            output_dir: test_dir,
            output_format: GroupingStrategy::Raw,
            include_custom_properties: false,
            invalid_records: InvalidRecordPolicy::Skip,
        };
        assert!(run(&config).is_err());
    }
}
