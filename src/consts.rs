/// Timestamp embedded in run folder names: "202401311530"
pub(crate) const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M";

/// Human-readable run timestamp used in selector labels: "2024-01-31 15:30"
pub(crate) const RUN_LABEL_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Standard date format used throughout the codebase: "2025-01-15"
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Extensions (lowercase, no dot) of files treated as chart images
pub(crate) const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg"];

/// Summary charts produced once per run, in display order
pub(crate) const DIAGNOSTIC_CHARTS: &[&str] = &[
    "hypersampling.png",
    "pareto_front.png",
    "prophet_decomp.png",
    "ROAS_convergence1.png",
    "ROAS_convergence2.png",
    "ROAS_convergence3.png",
];

/// Chart shown first when a run is opened
pub(crate) const DEFAULT_DIAGNOSTIC_CHART: &str = "pareto_front.png";

/// Written by the allocator into each run folder
pub(crate) const RESULTS_FILE: &str = "5_228_6_max_response_reallocated.csv";

pub(crate) const ALLOCATION_PARAMS_FILE: &str = "allocation_params.json";
pub(crate) const BUDGET_PARAMS_FILE: &str = "budget_params.csv";
pub(crate) const HYPERPARAMETER_FILE: &str = "hyperparameter_config.csv";
pub(crate) const MODEL_PARAMS_FILE: &str = "model_params.csv";

/// Country placeholder when the upload has no country column
pub(crate) const COUNTRY_NOT_SPECIFIED: &str = "Not specified";

pub(crate) const DEFAULT_CUSTOMERS: &[&str] = &["mars-pne", "unilever", "mars-wrigley", "colgate"];

/// Columns every upload must carry
pub(crate) const REQUIRED_COLUMNS: &[&str] = &[
    "dsp_recruit_cost",
    "dsp_conversion_cost",
    "dsp_awareness_cost",
    "sd_recruit_cost",
    "sp_auto_cost",
    "sb_defend_cost",
    "sp_recruit_cost",
    "sp_attack_cost",
    "sp_defend_cost",
    "sb_recruit_cost",
    "sd_defend_cost",
    "sb_attack_cost",
    "sd_attack_cost",
    "dsp_recruit_impressions",
    "dsp_conversion_impressions",
    "dsp_awareness_impressions",
    "sd_recruit_impressions",
    "sp_auto_clicks",
    "sb_defend_clicks",
    "sp_recruit_clicks",
    "sp_attack_clicks",
    "sp_defend_clicks",
    "sb_recruit_clicks",
    "sd_defend_clicks",
    "sb_attack_clicks",
    "sd_attack_clicks",
    "total_product_sales",
    "country",
    "date",
];
