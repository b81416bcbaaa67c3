//! The scenario record and its build sequence.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Utc};
use es_core::TimeIndex;
use es_graph::{EnergySystem, NodeRegistry, to_digraph};
use es_model::{Model, meta_results, parameters, results, write_lp};
use es_results::{Dump, DumpStore, ResultBundle, ScenarioInfo};
use es_tables::{TableCollection, csv_io, xlsx_io};
use es_viz::{DrawOptions, to_dot};
use tracing::info;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::node_factory::NodeFactory;

pub const DEFAULT_SCENARIO_NAME: &str = "unnamed_scenario";

/// Options of [`Scenario::plot_nodes`].
#[derive(Debug, Clone, Default)]
pub struct PlotOptions {
    /// Drop nodes whose label contains any of these substrings.
    pub remove_nodes_with_substrings: Vec<String>,
    pub draw: DrawOptions,
    /// Render an image to this path in addition to returning DOT text.
    pub output: Option<PathBuf>,
    /// Image format passed to Graphviz, `svg` if unset.
    pub format: Option<String>,
}

/// A scenario: input tables plus everything built from them.
///
/// The usual sequence is load tables, create nodes, [`Scenario::create_model`],
/// [`Scenario::solve`] and [`Scenario::dump_es`]. Each step fails if the one
/// before it has not run.
#[derive(Debug)]
pub struct Scenario {
    pub name: String,
    pub year: Option<i32>,
    /// Three time steps instead of a full year; LP files are written on solve.
    pub debug: bool,
    pub table_collection: TableCollection,
    location: Option<PathBuf>,
    es: Option<EnergySystem>,
    model: Option<Model>,
    results: Option<ResultBundle>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: DEFAULT_SCENARIO_NAME.to_string(),
            year: None,
            debug: false,
            table_collection: TableCollection::new(),
            location: None,
            es: None,
            model: None,
            results: None,
        }
    }
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_tables(mut self, tables: TableCollection) -> Self {
        self.table_collection = tables;
        self
    }

    /// Path the tables were loaded from.
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    pub fn es(&self) -> Option<&EnergySystem> {
        self.es.as_ref()
    }

    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    pub fn results(&self) -> Option<&ResultBundle> {
        self.results.as_ref()
    }

    /// Load every sheet of a workbook into the table collection.
    pub fn load_excel(&mut self, path: &Path) -> AppResult<()> {
        self.location = Some(path.to_path_buf());
        let tables = xlsx_io::load_workbook(path)?;
        self.table_collection.extend(tables);
        Ok(())
    }

    /// Load every `.csv` file of a directory into the table collection.
    pub fn load_csv(&mut self, dir: &Path) -> AppResult<()> {
        self.location = Some(dir.to_path_buf());
        let tables = csv_io::load_collection(dir)?;
        self.table_collection.extend(tables);
        Ok(())
    }

    pub fn to_excel(&self, path: &Path) -> AppResult<()> {
        xlsx_io::save_workbook(&self.table_collection, path)?;
        info!("Scenario saved as excel file to {}", path.display());
        Ok(())
    }

    pub fn to_csv(&self, dir: &Path) -> AppResult<()> {
        csv_io::save_collection(&self.table_collection, dir)?;
        info!("Scenario saved as csv-collection to {}", dir.display());
        Ok(())
    }

    /// Fail if the table holds missing values, naming every affected column.
    pub fn check_table(&self, name: &str) -> AppResult<()> {
        Ok(self.table_collection.check_table(name)?)
    }

    /// A fresh energy system for the scenario year.
    pub fn initialise_energy_system(&self) -> AppResult<EnergySystem> {
        let timeindex = TimeIndex::for_year(self.year, self.debug)?;
        Ok(EnergySystem::new(timeindex))
    }

    /// Replace the energy system with an empty one, optionally switching the
    /// year first.
    pub fn initialise_es(&mut self, year: Option<i32>) -> AppResult<()> {
        if year.is_some() {
            self.year = year;
        }
        self.es = Some(self.initialise_energy_system()?);
        self.model = None;
        Ok(())
    }

    /// Add the nodes of a finished build pass.
    ///
    /// A model built earlier no longer matches the system and is dropped.
    pub fn add_nodes(&mut self, nodes: NodeRegistry) -> AppResult<()> {
        if self.es.is_none() {
            self.initialise_es(None)?;
        }
        self.model = None;
        if let Some(es) = self.es.as_mut() {
            es.add_all(nodes)?;
        }
        Ok(())
    }

    /// Let `factory` create the nodes from this scenario and add them.
    pub fn add_nodes_from<F: NodeFactory + ?Sized>(&mut self, factory: &F) -> AppResult<()> {
        let nodes = factory.create_nodes(self)?;
        tracing::debug!(nodes = nodes.len(), "created nodes");
        self.add_nodes(nodes)
    }

    pub fn create_model(&mut self) -> AppResult<()> {
        let es = self.es.as_ref().ok_or(AppError::Missing {
            what: "energy system",
            hint: "add nodes first",
        })?;
        self.model = Some(Model::new(es)?);
        Ok(())
    }

    /// Solve the model with the configured solver and store all result facets.
    pub fn solve(&mut self, config: &AppConfig) -> AppResult<&ResultBundle> {
        info!("Optimising using {}.", config.general.solver);
        let solver = config.solver()?;

        let es = self.es.as_ref().ok_or(AppError::Missing {
            what: "energy system",
            hint: "add nodes first",
        })?;
        let model = self.model.as_ref().ok_or(AppError::Missing {
            what: "model",
            hint: "create the model first",
        })?;

        if self.debug {
            let filename = config.paths.lp_files.join(format!("{}.lp", self.name));
            info!("Store lp-file in {}.", filename.display());
            write_lp(model, &filename)?;
        }

        let solution = es_model::solve(model, solver)?;

        let mut meta = meta_results(model, &solution);
        meta.in_location = self.location.as_ref().map(|p| p.display().to_string());
        meta.file_date = match &self.location {
            Some(path) => Some(file_date(path)?),
            None => None,
        };

        let bundle = ResultBundle {
            main: results(model, &solution),
            meta,
            param: parameters(es),
            scenario: self.scenario_info(),
        };
        Ok(&*self.results.insert(bundle))
    }

    /// Write the energy system and its results to `path`.
    ///
    /// The system is validated first; JSON cannot hold non-finite numbers.
    pub fn dump_es(&self, path: &Path) -> AppResult<PathBuf> {
        let es = self.es.as_ref().ok_or(AppError::Missing {
            what: "energy system",
            hint: "nothing to dump",
        })?;
        es.validate()?;
        let (store, filename) = DumpStore::for_file(path)?;
        let written = store.dump(
            &filename,
            &Dump {
                energy_system: es.clone(),
                results: self.results.clone(),
            },
        )?;
        info!("Results dumped to {}.", path.display());
        Ok(written)
    }

    /// Replace energy system and results with a dump written by
    /// [`Scenario::dump_es`]. The model is dropped.
    pub fn restore_es(&mut self, path: &Path) -> AppResult<()> {
        let (store, filename) = DumpStore::for_file(path)?;
        let dump = store.restore(&filename)?;
        if self.year.is_none() {
            self.year = Some(dump.energy_system.timeindex().start().year());
        }
        self.es = Some(dump.energy_system);
        self.results = dump.results;
        self.model = None;
        info!("Results restored from {}.", path.display());
        Ok(())
    }

    pub fn scenario_info(&self) -> ScenarioInfo {
        ScenarioInfo {
            name: self.name.clone(),
            datetime: Utc::now(),
            year: self.year,
        }
    }

    /// DOT diagram of the energy system, optionally rendered to an image.
    pub fn plot_nodes(&self, options: &PlotOptions) -> AppResult<String> {
        let es = self.es.as_ref().ok_or(AppError::Missing {
            what: "energy system",
            hint: "add nodes first",
        })?;
        let remove: Vec<&str> = options
            .remove_nodes_with_substrings
            .iter()
            .map(String::as_str)
            .collect();
        let graph = to_digraph(es, &remove);
        let dot = to_dot(&graph, &options.draw);

        if let Some(output) = &options.output {
            let format = options.format.as_deref().unwrap_or("svg");
            es_viz::render(&dot, options.draw.layout, format, output)?;
            info!("Graph plotted to {}.", output.display());
        }
        Ok(dot)
    }
}

fn file_date(path: &Path) -> AppResult<DateTime<Utc>> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(DateTime::<Utc>::from(modified))
}
