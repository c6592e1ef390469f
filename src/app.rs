use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::allocator::run_allocator;
use crate::cli::{Cli, Commands, SessionCommands};
use crate::config::Config;
use crate::consts::{
    ALLOCATION_PARAMS_FILE, BUDGET_PARAMS_FILE, DEFAULT_CUSTOMERS, HYPERPARAMETER_FILE,
    MODEL_PARAMS_FILE,
};
use crate::error::AppError;
use crate::export::{
    read_allocation_json, write_allocation_json, write_budget_params_csv,
    write_hyperparameters_csv, write_model_settings_csv,
};
use crate::model::{
    AllocationParams, ChannelHyperparameters, DEFAULT_PLOT_FOLDER, parse_constraint_override,
    parse_range_override,
};
use crate::output::{
    output_results_json, output_session_json, print_charts_table, print_curves,
    print_hyperparameters, print_json, print_results, print_runs_table, print_session,
    print_upload_report,
};
use crate::results::{load_results, results_path};
use crate::runs::{RunSelector, classify_run, scan_run_folders};
use crate::session::{NavAction, Page, SessionState, SessionStore, View, default_session_dir};
use crate::upload::load_upload;
use crate::utils::parse_date;

const DEFAULT_ALLOCATOR: &[&str] = &["python", "budget_alloc.py"];

pub(crate) struct CommandContext<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) store: SessionStore,
    pub(crate) runs_root: PathBuf,
    pub(crate) output_dir: PathBuf,
    pub(crate) hyperparameter_dir: PathBuf,
    pub(crate) allocator_command: Vec<String>,
    pub(crate) customers: Vec<String>,
}

impl<'a> CommandContext<'a> {
    pub(crate) fn new(cli: &'a Cli, config: &Config) -> Self {
        let state_dir = cli
            .state_dir
            .clone()
            .or_else(default_session_dir)
            .unwrap_or_else(|| PathBuf::from(".mmmdash").join("sessions"));
        let allocator_command = config.allocator_command.clone().unwrap_or_else(|| {
            DEFAULT_ALLOCATOR.iter().map(|s| s.to_string()).collect()
        });
        let customers = config.customers.clone().unwrap_or_else(|| {
            DEFAULT_CUSTOMERS.iter().map(|s| s.to_string()).collect()
        });
        Self {
            cli,
            store: SessionStore::new(state_dir),
            runs_root: cli.runs_root(),
            output_dir: cli.output_dir(),
            hyperparameter_dir: cli.hyperparameter_dir(),
            allocator_command,
            customers,
        }
    }

    fn session(&self) -> &str {
        &self.cli.session
    }

    fn use_color(&self) -> bool {
        self.cli.use_color()
    }

    fn load_runs(&self) -> Result<RunSelector, AppError> {
        Ok(RunSelector::new(scan_run_folders(&self.runs_root)?))
    }

    /// A missing root is reported and treated as an empty listing
    fn load_runs_or_empty(&self) -> Result<RunSelector, AppError> {
        match self.load_runs() {
            Ok(selector) => Ok(selector),
            Err(e @ AppError::MissingRunsRoot { .. }) => {
                if self.cli.json {
                    eprintln!("{e}");
                } else {
                    println!("{e}");
                }
                Ok(RunSelector::new(Vec::new()))
            }
            Err(e) => Err(e),
        }
    }
}

fn handle_runs(ctx: &CommandContext<'_>, state: &SessionState) -> Result<(), AppError> {
    let selector = ctx.load_runs_or_empty()?;
    if ctx.cli.json {
        return print_json(selector.entries());
    }
    if selector.is_empty() {
        if ctx.runs_root.is_dir() {
            println!("No run folders found in {}.", ctx.runs_root.display());
        }
        return Ok(());
    }
    print_runs_table(&selector, state.selected_run.as_deref(), ctx.use_color());
    Ok(())
}

fn handle_charts(
    ctx: &CommandContext<'_>,
    state: &mut SessionState,
    run: Option<&str>,
) -> Result<(), AppError> {
    // An open results view replaces the chart browser
    if state.view() == View::AllocationResults {
        if !ctx.cli.json {
            println!("Showing allocation results. Run `mmmdash session close-results` to browse charts.");
        }
        return handle_results(ctx, state);
    }
    let selector = ctx.load_runs_or_empty()?;
    let folder = match run.or(state.selected_run.as_deref()) {
        Some(key) => selector.resolve(key).ok_or_else(|| AppError::UnknownRun {
            input: key.to_string(),
        })?,
        None => match selector.latest() {
            Some(folder) => folder,
            None => {
                if ctx.cli.json {
                    return print_json(&serde_json::Value::Null);
                }
                if ctx.runs_root.is_dir() {
                    println!("No run folders found in {}.", ctx.runs_root.display());
                }
                return Ok(());
            }
        },
    };

    let artifacts = classify_run(&folder.path)?;
    if ctx.cli.json {
        return print_json(&serde_json::json!({
            "folder": folder.name,
            "default_chart": artifacts.default_chart(),
            "diagnostics": artifacts.diagnostics,
            "candidates": artifacts.candidates,
            "models": artifacts.model_ids().collect::<Vec<_>>(),
        }));
    }
    let label = selector.label_for(&folder.name).unwrap_or(&folder.name);
    print_charts_table(label, &artifacts, state.selected_model.as_deref(), ctx.use_color());
    Ok(())
}

fn handle_select(
    ctx: &CommandContext<'_>,
    state: &mut SessionState,
    run: &str,
    model: Option<&str>,
) -> Result<(), AppError> {
    state.require_page(Page::ModelRun)?;
    if state.view() == View::AllocationResults {
        return Err(AppError::ResultsViewOpen);
    }
    let selector = ctx.load_runs()?;
    let folder = selector.resolve(run).ok_or_else(|| AppError::UnknownRun {
        input: run.to_string(),
    })?;

    if let Some(model) = model {
        let artifacts = classify_run(&folder.path)?;
        if !artifacts.has_model(model) {
            return Err(AppError::UnknownModel {
                model: model.to_string(),
                run: folder.name.clone(),
            });
        }
    }

    state.select_run(&folder.name);
    if let Some(model) = model {
        state.select_model(model);
    }
    info!("Selected run {} model {:?}", folder.name, state.selected_model);

    if ctx.cli.json {
        return print_json(&serde_json::json!({
            "run": folder.name,
            "model": state.selected_model,
        }));
    }
    let label = selector.label_for(&folder.name).unwrap_or(&folder.name);
    match &state.selected_model {
        Some(model) => println!("Selected {label}, model {model}"),
        None => println!("Selected {label}"),
    }
    Ok(())
}

fn handle_upload(
    ctx: &CommandContext<'_>,
    state: &mut SessionState,
    file: &std::path::Path,
    country: Option<&str>,
    proceed: bool,
) -> Result<(), AppError> {
    if proceed {
        state.require_page(Page::Upload)?;
    }
    let report = load_upload(file)?;
    if !report.has_country_column() {
        warn!("No country column in {}", file.display());
    }

    if ctx.cli.json {
        print_json(&report)?;
    } else {
        print_upload_report(&report, ctx.use_color());
    }

    if !proceed {
        return Ok(());
    }
    if !report.is_valid() {
        return Err(AppError::MissingColumns {
            missing: report.missing,
        });
    }
    let country = report.choose_country(country)?;
    state.country = Some(country);
    state.navigate(NavAction::Next);
    if !ctx.cli.json {
        println!("Continuing to {}.", state.page.title());
    }
    Ok(())
}

struct HyperparamChanges<'a> {
    overrides: &'a [String],
    iterations: Option<u32>,
    trials: Option<u32>,
    ts_validation: Option<bool>,
    save: bool,
}

fn handle_hyperparams(
    ctx: &CommandContext<'_>,
    state: &mut SessionState,
    changes: HyperparamChanges<'_>,
) -> Result<(), AppError> {
    state.require_page(Page::HyperparameterAdjustment)?;

    // Validate everything before touching the session
    let mut set = state.hyperparameters();
    for raw in changes.overrides {
        let (ad_type, param, range) = parse_range_override(raw)?;
        set.set(&ad_type, param, range)?;
    }
    let mut settings = state.settings;
    if let Some(iterations) = changes.iterations {
        settings.set_iterations(iterations)?;
    }
    if let Some(trials) = changes.trials {
        settings.set_trials(trials)?;
    }
    if let Some(ts_validation) = changes.ts_validation {
        settings.ts_validation = ts_validation;
    }

    if !changes.overrides.is_empty() {
        state.hyperparameters = Some(set.clone());
    }
    state.settings = settings;

    if changes.save {
        let hyper_path = ctx.hyperparameter_dir.join(HYPERPARAMETER_FILE);
        let settings_path = ctx.hyperparameter_dir.join(MODEL_PARAMS_FILE);
        write_hyperparameters_csv(&hyper_path, &set)?;
        write_model_settings_csv(
            &settings_path,
            &settings,
            state.country.as_deref(),
            state.customer.as_deref(),
        )?;
        info!(
            "Saved {} and {}",
            hyper_path.display(),
            settings_path.display()
        );
    }

    if ctx.cli.json {
        return print_json(&serde_json::json!({
            "hyperparameters": set,
            "settings": settings,
        }));
    }
    print_hyperparameters(&set, &settings, ctx.use_color());
    if changes.save {
        println!(
            "Saved {} and {} to {}",
            HYPERPARAMETER_FILE,
            MODEL_PARAMS_FILE,
            ctx.hyperparameter_dir.display()
        );
    }
    Ok(())
}

fn handle_curves(
    ctx: &CommandContext<'_>,
    state: &SessionState,
    ad_type: &str,
) -> Result<(), AppError> {
    state.require_page(Page::HyperparameterAdjustment)?;
    let set = state.hyperparameters();
    let ranges: &ChannelHyperparameters =
        set.get(ad_type).ok_or_else(|| AppError::UnknownAdType {
            input: ad_type.to_string(),
        })?;

    if ctx.cli.json {
        return print_json(&serde_json::json!({
            "ad_type": ad_type,
            "adstock": ranges.adstock_preview(),
            "response": ranges.response_preview(),
        }));
    }
    print_curves(ad_type, ranges, ctx.use_color());
    Ok(())
}

struct AllocateRequest<'a> {
    budget: Option<u64>,
    from: Option<&'a str>,
    to: Option<&'a str>,
    constraints: &'a [String],
    plot_folder: Option<&'a str>,
    no_export: bool,
    skip_run: bool,
}

fn build_allocation(model: &str, request: &AllocateRequest<'_>) -> Result<AllocationParams, AppError> {
    let mut params = AllocationParams::new(model);
    if let Some(budget) = request.budget {
        params.total_budget = budget;
    }
    if request.from.is_some() || request.to.is_some() {
        let from = request.from.map(parse_date).transpose()?;
        let to = request.to.map(parse_date).transpose()?;
        params.set_date_range(
            from.unwrap_or(params.date_range[0]),
            to.unwrap_or(params.date_range[1]),
        )?;
    }
    for raw in request.constraints {
        let (channel, constraint) = parse_constraint_override(raw)?;
        params.set_constraint(&channel, constraint)?;
    }
    params.export = !request.no_export;
    Ok(params)
}

fn handle_allocate(
    ctx: &CommandContext<'_>,
    state: &mut SessionState,
    request: AllocateRequest<'_>,
) -> Result<(), AppError> {
    state.require_page(Page::ModelRun)?;
    let model = state
        .selected_model
        .clone()
        .ok_or(AppError::NoModelSelected)?;
    let params = build_allocation(&model, &request)?;

    let json_path = ctx.output_dir.join(ALLOCATION_PARAMS_FILE);
    let csv_path = ctx.output_dir.join(BUDGET_PARAMS_FILE);
    write_allocation_json(&json_path, &params)?;
    write_budget_params_csv(
        &csv_path,
        &params,
        request.plot_folder.unwrap_or(DEFAULT_PLOT_FOLDER),
    )?;
    debug!("Wrote {} and {}", json_path.display(), csv_path.display());

    if request.skip_run {
        state.allocation = Some(params);
        if !ctx.cli.json {
            println!(
                "Wrote {} and {} to {}",
                ALLOCATION_PARAMS_FILE,
                BUDGET_PARAMS_FILE,
                ctx.output_dir.display()
            );
        }
        return Ok(());
    }

    let output = run_allocator(&ctx.allocator_command, &ctx.output_dir)?;
    if !output.stderr.trim().is_empty() {
        debug!("Allocator stderr: {}", output.stderr.trim());
    }
    state.open_results(params);

    if ctx.cli.json {
        return print_json(&serde_json::json!({
            "allocation": state.allocation,
            "allocator_output": output.stdout,
        }));
    }
    if !output.stdout.trim().is_empty() {
        println!("{}", output.stdout.trim_end());
    }
    println!("Allocation finished. Run `mmmdash results` to view it.");
    Ok(())
}

fn handle_results(ctx: &CommandContext<'_>, state: &mut SessionState) -> Result<(), AppError> {
    if state.view() != View::AllocationResults {
        state.require_page(Page::ModelRun)?;
    }
    let run = state
        .selected_run
        .clone()
        .ok_or(AppError::NoRunSelected)?;
    let path = results_path(&ctx.runs_root.join(&run));

    let results = match load_results(&path) {
        Ok(results) => results,
        Err(e @ AppError::MissingResultsFile { .. }) => {
            if state.view_allocation {
                state.view_allocation = false;
                ctx.store.save(ctx.session(), state)?;
            }
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    let params = match &state.allocation {
        Some(params) => Some(params.clone()),
        None => {
            let stored = ctx.output_dir.join(ALLOCATION_PARAMS_FILE);
            if stored.is_file() {
                Some(read_allocation_json(&stored)?)
            } else {
                None
            }
        }
    };

    if ctx.cli.json {
        return output_results_json(params.as_ref(), &results);
    }
    print_results(params.as_ref(), &results, ctx.use_color());
    Ok(())
}

fn handle_session(
    ctx: &CommandContext<'_>,
    state: &mut SessionState,
    command: &SessionCommands,
) -> Result<(), AppError> {
    match command {
        SessionCommands::Show => {}
        SessionCommands::Next => {
            state.navigate(NavAction::Next);
        }
        SessionCommands::Back => {
            state.navigate(NavAction::Back);
        }
        SessionCommands::Customer { name } => {
            state.set_customer(name)?;
            if let Some(customer) = &state.customer
                && !ctx.customers.contains(customer)
            {
                info!("Using new customer \"{customer}\"");
            }
        }
        SessionCommands::CloseResults => state.close_results(),
        SessionCommands::Reset => {
            ctx.store.reset(ctx.session())?;
            *state = SessionState::default();
            debug!("Session \"{}\" reset", ctx.session());
        }
    }

    let run_label = match &state.selected_run {
        Some(folder) => ctx
            .load_runs()
            .ok()
            .and_then(|s| s.label_for(folder).map(str::to_string)),
        None => None,
    };
    if ctx.cli.json {
        return output_session_json(ctx.session(), state, run_label.as_deref(), &ctx.customers);
    }
    print_session(
        ctx.session(),
        state,
        run_label.as_deref(),
        &ctx.customers,
        ctx.use_color(),
    );
    Ok(())
}

/// Run one command against the persisted session
pub(crate) fn run(cli: &Cli, config: &Config) -> Result<(), AppError> {
    let ctx = CommandContext::new(cli, config);
    let mut state = ctx.store.load(ctx.session())?;
    debug!(
        "Session \"{}\" on {} (store {})",
        ctx.session(),
        state.page,
        ctx.store.dir().display()
    );

    let show = Commands::Session {
        command: Some(SessionCommands::Show),
    };
    let command = cli.command.as_ref().unwrap_or(&show);

    match command {
        Commands::Runs => handle_runs(&ctx, &state)?,
        Commands::Charts { run } => handle_charts(&ctx, &mut state, run.as_deref())?,
        Commands::Select { run, model } => {
            handle_select(&ctx, &mut state, run, model.as_deref())?;
        }
        Commands::Upload {
            file,
            country,
            proceed,
        } => handle_upload(&ctx, &mut state, file, country.as_deref(), *proceed)?,
        Commands::Hyperparams {
            set,
            iterations,
            trials,
            ts_validation,
            save,
        } => handle_hyperparams(
            &ctx,
            &mut state,
            HyperparamChanges {
                overrides: set,
                iterations: *iterations,
                trials: *trials,
                ts_validation: *ts_validation,
                save: *save,
            },
        )?,
        Commands::Curves { ad_type } => handle_curves(&ctx, &state, ad_type)?,
        Commands::Allocate {
            budget,
            from,
            to,
            constraints,
            plot_folder,
            no_export,
            skip_run,
        } => handle_allocate(
            &ctx,
            &mut state,
            AllocateRequest {
                budget: *budget,
                from: from.as_deref(),
                to: to.as_deref(),
                constraints,
                plot_folder: plot_folder.as_deref(),
                no_export: *no_export,
                skip_run: *skip_run,
            },
        )?,
        Commands::Results => handle_results(&ctx, &mut state)?,
        Commands::Session { command } => handle_session(
            &ctx,
            &mut state,
            command.as_ref().unwrap_or(&SessionCommands::Show),
        )?,
    }

    if command.mutates_session() {
        ctx.store.save(ctx.session(), &state)?;
    }
    Ok(())
}
