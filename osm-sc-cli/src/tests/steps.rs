//! Behaviour-driven step definitions driving the convert CLI scenarios.

use super::helpers::{LayerOverrides, Workspace, merge_layers};
use super::*;
use crate::convert::{ConvertConfig, ConvertOutcome, execute_convert, resolve_convert_config};
use camino::Utf8PathBuf;
use osm_sc_core::ScTables;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

/// Convert scenario state shared by every step through a single fixture.
#[derive(Debug)]
struct ConvertWorld {
    workspace: Workspace,
    input: RefCell<Option<Utf8PathBuf>>,
    cli_args: RefCell<Vec<String>>,
    config_result: RefCell<Option<Result<ConvertConfig, CliError>>>,
    run_result: RefCell<Option<Result<ConvertOutcome, CliError>>>,
    config_layer: RefCell<Option<LayerOverrides>>,
    env_layer: RefCell<Option<LayerOverrides>>,
}

impl ConvertWorld {
    fn new() -> Self {
        Self {
            workspace: Workspace::new(),
            input: RefCell::new(None),
            cli_args: RefCell::new(Vec::new()),
            config_result: RefCell::new(None),
            run_result: RefCell::new(None),
            config_layer: RefCell::new(None),
            env_layer: RefCell::new(None),
        }
    }

    fn output_dir(&self) -> Utf8PathBuf {
        self.workspace.path("tables")
    }

    fn env_output_dir(&self) -> Utf8PathBuf {
        self.workspace.path("env-tables")
    }

    fn config_output_dir(&self) -> Utf8PathBuf {
        self.workspace.path("config-tables")
    }

    fn staged_input(&self) -> Utf8PathBuf {
        self.input
            .borrow()
            .clone()
            .expect("an input should have been staged")
    }

    fn push_flag(&self, flag: &str, value: &Utf8Path) {
        self.cli_args
            .borrow_mut()
            .extend([format!("--{flag}"), value.as_str().to_owned()]);
    }

    fn parse_convert(&self) -> Result<ConvertArgs, CliError> {
        let mut invocation = vec!["osm-sc".to_owned(), "convert".to_owned()];
        invocation.extend(self.cli_args.borrow().iter().cloned());
        Cli::try_parse_from(invocation)
            .map_err(CliError::ArgumentParsing)
            .map(|cli| match cli.command {
                Command::Convert(args) => args,
            })
    }
}

#[fixture]
fn world() -> ConvertWorld {
    ConvertWorld::new()
}

#[given("an OSM extract exists on disk")]
fn extract_exists(#[from(world)] world: &ConvertWorld) {
    let path = world.workspace.write_osm("extract.osm");
    assert!(path.exists(), "expected the extract to exist on disk");
    world.input.replace(Some(path));
}

#[given("a bzip2-compressed OSM extract exists on disk")]
fn compressed_extract_exists(#[from(world)] world: &ConvertWorld) {
    let path = world.workspace.write_osm_bz2("extract.osm.bz2");
    assert!(path.exists(), "expected the extract to exist on disk");
    world.input.replace(Some(path));
}

#[given("I pass the input and output paths with CLI flags")]
fn cli_provides_paths(#[from(world)] world: &ConvertWorld) {
    world.push_flag(ARG_INPUT, &world.staged_input());
    world.push_flag(ARG_OUTPUT_DIR, &world.output_dir());
    world
        .cli_args
        .borrow_mut()
        .extend([format!("--{ARG_SEED}"), "11".to_owned()]);
}

#[given("I pass the compressed input and output paths with CLI flags")]
fn cli_provides_compressed_paths(#[from(world)] world: &ConvertWorld) {
    world.push_flag(ARG_INPUT, &world.staged_input());
    world.push_flag(ARG_OUTPUT_DIR, &world.output_dir());
    world
        .cli_args
        .borrow_mut()
        .push(format!("--{ARG_UNIQUE_EDGE_IDS}"));
}

#[given("I pass only the output directory flag")]
fn cli_only_output(#[from(world)] world: &ConvertWorld) {
    world.push_flag(ARG_OUTPUT_DIR, &world.output_dir());
    *world.config_layer.borrow_mut() = None;
    *world.env_layer.borrow_mut() = None;
}

#[given("the input and output paths are provided via a config file")]
fn provided_via_config(#[from(world)] world: &ConvertWorld) {
    let config_input = world.workspace.write_osm("config.osm");
    *world.config_layer.borrow_mut() = Some(LayerOverrides {
        input: Some(config_input),
        output_dir: Some(world.config_output_dir()),
        seed: Some(3),
    });
}

#[given("the output directory is overridden via environment variables")]
fn output_overridden_by_env(#[from(world)] world: &ConvertWorld) {
    *world.env_layer.borrow_mut() = Some(LayerOverrides {
        output_dir: Some(world.env_output_dir()),
        ..LayerOverrides::default()
    });
}

#[given("I pass the input path with a CLI flag")]
fn cli_only_input(#[from(world)] world: &ConvertWorld) {
    world.push_flag(ARG_INPUT, &world.staged_input());
}

#[when("I configure the convert command")]
fn configure_convert(#[from(world)] world: &ConvertWorld) {
    let file_layer = world.config_layer.borrow().clone();
    let env_layer = world.env_layer.borrow().clone();
    let outcome = world.parse_convert().and_then(|args| {
        if file_layer.is_some() || env_layer.is_some() {
            merge_layers(args, file_layer, env_layer)
        } else {
            resolve_convert_config(args)
        }
    });
    world.config_result.replace(Some(outcome));
}

#[when("I run the convert command")]
fn run_convert_command(#[from(world)] world: &ConvertWorld) {
    let outcome = world
        .parse_convert()
        .and_then(|args| merge_layers(args, None, None))
        .and_then(|config| execute_convert(&config));
    world.run_result.replace(Some(outcome));
}

#[then("every silicate table is written as JSON")]
fn tables_written(#[from(world)] world: &ConvertWorld) {
    let borrowed = world.run_result.borrow();
    let outcome = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect("expected success");
    assert_eq!(outcome.output_dir, world.output_dir());
    let names: Vec<&str> = outcome.written.iter().map(|table| table.name).collect();
    assert_eq!(names, ScTables::NAMES);
    for table in &outcome.written {
        assert!(table.path.is_file(), "missing {}", table.path);
        assert!(table.rows > 0, "{} should not be empty", table.name);
    }
}

#[then("the CLI reports that the \"input\" flag is missing")]
fn reports_missing_input(#[from(world)] world: &ConvertWorld) {
    let borrowed = world.config_result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_INPUT),
        other => panic!("unexpected error {other:?}"),
    }
}

#[then("CLI and environment layers override configuration defaults")]
fn precedence_holds(#[from(world)] world: &ConvertWorld) {
    let borrowed = world.config_result.borrow();
    let config = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect("expected success");
    assert_eq!(config.input, world.staged_input());
    assert_eq!(config.output_dir, world.env_output_dir());
    assert_eq!(config.seed, Some(3));
}

macro_rules! register_convert_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/convert_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: ConvertWorld) {
            let _ = world;
        }
    };
}

register_convert_scenario!(cli_flag_conversion, "converting an extract named by CLI flags");
register_convert_scenario!(compressed_conversion, "converting a bzip2-compressed extract");
register_convert_scenario!(rejecting_missing_input, "rejecting a missing input");
register_convert_scenario!(
    layering_cli_config_env,
    "layering CLI, config file, and environment values"
);
