use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use raid_plot::{
    ChartSpec, ExperimentSchema, FacetSpec, ParamStyle, ResultsDB,
    SparsePolicy, Variant,
};

// folder where the benchmark logs live
const LOG_DIR: &str = "logs";

// folder where all plots will be stored
const PLOT_DIR: &str = "plots";

// the file size both device-count experiments were run with; its exact
// bytes appear in the benchmark function names and select the single
// file-size row each chart draws
const FIXED_SIZE_CONTROLLER: &str = "single_31509708";
const FIXED_SIZE_CHECKPOINT: &str = "dist_31509708";

fn main() -> Result<(), Report> {
    // init logging
    tracing_subscriber::fmt::init();

    std::fs::create_dir_all(PLOT_DIR)
        .wrap_err_with(|| format!("create {}", PLOT_DIR))?;

    file_charts()?;
    cread_chart()?;
    cwrite_chart()?;
    dwrite_chart()?;
    dread_chart()?;
    crecover_chart()?;
    drecover_chart()?;
    Ok(())
}

// read and write time over the file size, from one load of the same log
fn file_charts() -> Result<(), Report> {
    println!(">>>>>>>> FILE READ + WRITE <<<<<<<<");
    let log_file = format!("{}/small.txt", LOG_DIR);
    let db = ResultsDB::load(&log_file).wrap_err("load results")?;

    let schema = |tag| {
        ExperimentSchema::new(
            tag,
            ParamStyle::VariantSuffix,
            vec![
                (String::from("single"), Variant::Controller),
                (String::from("dist"), Variant::Checkpoint),
            ],
        )
    };

    let read_spec = ChartSpec::new(
        &log_file,
        schema("read"),
        0,
        1e-6,
        "file size in bytes",
        "read time in ms",
        format!("{}/file_read.svg", PLOT_DIR),
    );
    raid_plot::comparison_plot_with(&read_spec, &db, |_| true)?;

    let write_spec = ChartSpec::new(
        &log_file,
        schema("write"),
        0,
        1e-6,
        "file size in bytes",
        "write time in ms",
        format!("{}/file_write.svg", PLOT_DIR),
    );
    raid_plot::comparison_plot_with(&write_spec, &db, |_| true)?;
    Ok(())
}

// read time over the checksum device count, at the fixed file size
fn cread_chart() -> Result<(), Report> {
    println!(">>>>>>>> CREAD <<<<<<<<");
    let schema = ExperimentSchema::new(
        "cread",
        ParamStyle::PackedDigits { count: 2 },
        vec![
            (String::from(FIXED_SIZE_CONTROLLER), Variant::Controller),
            (String::from(FIXED_SIZE_CHECKPOINT), Variant::Checkpoint),
        ],
    );
    // parameters are (d, c); c varies on the x axis
    let spec = ChartSpec::new(
        format!("{}/bigger.txt", LOG_DIR),
        schema,
        1,
        1e-6,
        "number of checksum devices",
        "read time in ms",
        format!("{}/cread.svg", PLOT_DIR),
    );
    raid_plot::comparison_plot(&spec)
}

fn cwrite_chart() -> Result<(), Report> {
    println!(">>>>>>>> CWRITE <<<<<<<<");
    let schema = ExperimentSchema::new(
        "cwrite",
        ParamStyle::PackedDigits { count: 2 },
        vec![
            (String::from(FIXED_SIZE_CONTROLLER), Variant::Controller),
            (String::from(FIXED_SIZE_CHECKPOINT), Variant::Checkpoint),
        ],
    );
    let spec = ChartSpec::new(
        format!("{}/small.txt", LOG_DIR),
        schema,
        1,
        1e-6,
        "number of checksum devices",
        "write time in ms",
        format!("{}/cwrite.svg", PLOT_DIR),
    );
    raid_plot::comparison_plot(&spec)
}

// write time over the data device count, at the fixed file size
fn dwrite_chart() -> Result<(), Report> {
    println!(">>>>>>>> DWRITE <<<<<<<<");
    let schema = ExperimentSchema::new(
        "dwrite",
        ParamStyle::Underscored { count: 2 },
        vec![
            (String::from(FIXED_SIZE_CONTROLLER), Variant::Controller),
            (String::from(FIXED_SIZE_CHECKPOINT), Variant::Checkpoint),
        ],
    );
    let log_file = format!("{}/small.txt", LOG_DIR);
    let mut spec = ChartSpec::new(
        &log_file,
        schema,
        0,
        1e-6,
        "number of data devices",
        "write time in ms",
        format!("{}/dwrite.svg", PLOT_DIR),
    );
    spec.set_size(600, 400);

    let db = ResultsDB::load(&log_file).wrap_err("load results")?;
    // the harness goes up to 100 data devices; the chart stops at 9
    raid_plot::comparison_plot_with(&spec, &db, |key| key.params[0] <= 9)
}

fn dread_chart() -> Result<(), Report> {
    println!(">>>>>>>> DREAD <<<<<<<<");
    let schema = ExperimentSchema::new(
        "dread",
        ParamStyle::Underscored { count: 2 },
        vec![
            (String::from(FIXED_SIZE_CONTROLLER), Variant::Controller),
            (String::from(FIXED_SIZE_CHECKPOINT), Variant::Checkpoint),
        ],
    );
    let log_file = format!("{}/small.txt", LOG_DIR);
    let mut spec = ChartSpec::new(
        &log_file,
        schema,
        0,
        1e-6,
        "number of data devices",
        "read time in ms",
        format!("{}/dread.svg", PLOT_DIR),
    );
    spec.set_size(600, 400);

    let db = ResultsDB::load(&log_file).wrap_err("load results")?;
    raid_plot::comparison_plot_with(&spec, &db, |key| key.params[0] <= 9)
}

// recover time over the checksum device count, one series pair per
// failure count
fn crecover_chart() -> Result<(), Report> {
    println!(">>>>>>>> CRECOVER <<<<<<<<");
    let schema = ExperimentSchema::new(
        "recover",
        ParamStyle::PackedDigits { count: 3 },
        vec![
            (String::from("single recover"), Variant::Controller),
            (String::from("distributed recover"), Variant::Checkpoint),
        ],
    );
    // parameters are (d, c, f); c varies on the x axis and f facets
    let mut spec = ChartSpec::new(
        format!("{}/small.txt", LOG_DIR),
        schema,
        1,
        1e-9,
        "number of checksum devices",
        "recover time in seconds",
        format!("{}/crecover.svg", PLOT_DIR),
    );
    spec.set_facet(FacetSpec::new(2, vec![6, 5, 4, 3, 2, 1], "failures"))
        // light for the controller, dark for the checkpoint, one pair
        // per failure count
        .set_palette(vec![
            ("red", "darkred"),
            ("gold", "goldenrod"),
            ("teal", "#00F0F0"),
            ("violet", "darkviolet"),
            ("lightgreen", "darkgreen"),
            ("blue", "darkblue"),
        ])
        // f failures only run with c >= f checksum devices, so the
        // f = 6 pair has a single point at c = 6; a sentinel just below
        // gives it a visible flat segment
        .set_sparse(SparsePolicy::Pad { x: 5.9 })
        .set_size(1000, 600);
    raid_plot::comparison_plot(&spec)
}

fn drecover_chart() -> Result<(), Report> {
    println!(">>>>>>>> DRECOVER <<<<<<<<");
    let schema = ExperimentSchema::new(
        "drecover",
        ParamStyle::Underscored { count: 3 },
        vec![
            (String::from("single recover"), Variant::Controller),
            (String::from("distributed recover"), Variant::Checkpoint),
        ],
    );
    // parameters are (d, c, f); d varies on the x axis and f facets
    let mut spec = ChartSpec::new(
        format!("{}/bigger.txt", LOG_DIR),
        schema,
        0,
        1e-9,
        "number of data devices",
        "recover time in seconds",
        format!("{}/drecover.svg", PLOT_DIR),
    );
    spec.set_facet(FacetSpec::new(2, vec![1, 2], "failures"));
    raid_plot::comparison_plot(&spec)
}
