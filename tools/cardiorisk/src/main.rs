use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use medi_cardio::form::{self, FORM_FIELDS};
use medi_cardio::{
    encode, CardioConfig, CardioError, OutputFormat, PatientRecord, Presence, Sex,
};

mod prompt;

const EXIT_INVALID_INPUT: i32 = 1;
const EXIT_ARTIFACTS: i32 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "cardiorisk",
    version,
    about = "Heart failure death-risk prediction from twelve clinical measurements",
    long_about = "cardiorisk encodes a patient's clinical measurements, normalizes them with a\n\
        fitted scaler and scores them with a fitted classifier. Probabilities above 0.5\n\
        are reported as high risk.\n\n\
        EXAMPLES:\n\
        \n  cardiorisk predict --age 65 --ejection-fraction 25 --serum-creatinine 2.1\n\
        \n  cardiorisk predict --interactive --config demos/cardiorisk.toml\n\
        \n  cardiorisk predict --input patient.json --json\n\
        \n  cardiorisk encode --sex female --smoking yes\n\
        \n  cardiorisk form"
)]
struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Predict the risk of death for one patient
    Predict(PredictArgs),
    /// Print the encoded feature vector without running the model
    Encode(EncodeArgs),
    /// Show the input form: fields, units, ranges and defaults
    Form,
}

// Field values; anything omitted keeps the form default.
#[derive(Debug, Args, Clone, Default)]
struct PatientArgs {
    /// Patient record as JSON (flags given alongside override its values)
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Age in years (18-100)
    #[arg(long)]
    age: Option<f64>,
    /// Anaemia (yes/no)
    #[arg(long)]
    anaemia: Option<Presence>,
    /// Creatinine phosphokinase, mcg/L
    #[arg(long)]
    creatinine_phosphokinase: Option<f64>,
    /// Diabetes (yes/no)
    #[arg(long)]
    diabetes: Option<Presence>,
    /// Ejection fraction, % (10-80)
    #[arg(long)]
    ejection_fraction: Option<f64>,
    /// High blood pressure (yes/no)
    #[arg(long)]
    high_blood_pressure: Option<Presence>,
    /// Platelets, kiloplatelets/mL
    #[arg(long)]
    platelets: Option<f64>,
    /// Serum creatinine, mg/dL
    #[arg(long)]
    serum_creatinine: Option<f64>,
    /// Serum sodium, mEq/L (100-150)
    #[arg(long)]
    serum_sodium: Option<f64>,
    /// Sex (male/female)
    #[arg(long)]
    sex: Option<Sex>,
    /// Smoking (yes/no)
    #[arg(long)]
    smoking: Option<Presence>,
    /// Follow-up period in days (0-300)
    #[arg(long)]
    time: Option<f64>,
}

#[derive(Debug, Args, Clone)]
struct PredictArgs {
    #[command(flatten)]
    patient: PatientArgs,

    /// Prompt for each field on stdin
    #[arg(short, long)]
    interactive: bool,

    /// Classifier artifact (JSON)
    #[arg(long, value_name = "FILE", env = "CARDIORISK_MODEL")]
    model: Option<PathBuf>,

    /// Scaler artifact (JSON)
    #[arg(long, value_name = "FILE", env = "CARDIORISK_SCALER")]
    scaler: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE", env = "CARDIORISK_CONFIG")]
    config: Option<PathBuf>,

    /// Print the assessment as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args, Clone)]
struct EncodeArgs {
    #[command(flatten)]
    patient: PatientArgs,

    /// Print the vector as a JSON object
    #[arg(long)]
    json: bool,
}

impl PatientArgs {
    fn record(&self) -> Result<PatientRecord, String> {
        let mut record = match &self.input {
            Some(path) => read_patient(path)?,
            None => PatientRecord::default(),
        };
        record.age = self.age.unwrap_or(record.age);
        record.anaemia = self.anaemia.unwrap_or(record.anaemia);
        record.creatinine_phosphokinase = self.creatinine_phosphokinase.unwrap_or(record.creatinine_phosphokinase);
        record.diabetes = self.diabetes.unwrap_or(record.diabetes);
        record.ejection_fraction = self.ejection_fraction.unwrap_or(record.ejection_fraction);
        record.high_blood_pressure = self.high_blood_pressure.unwrap_or(record.high_blood_pressure);
        record.platelets = self.platelets.unwrap_or(record.platelets);
        record.serum_creatinine = self.serum_creatinine.unwrap_or(record.serum_creatinine);
        record.serum_sodium = self.serum_sodium.unwrap_or(record.serum_sodium);
        record.sex = self.sex.unwrap_or(record.sex);
        record.smoking = self.smoking.unwrap_or(record.smoking);
        record.time = self.time.unwrap_or(record.time);
        Ok(record)
    }
}

fn read_patient(path: &Path) -> Result<PatientRecord, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("cannot read '{}': {e}", path.display()))?;
    serde_json::from_str(&text)
        .map_err(|e| format!("invalid patient record '{}': {e}", path.display()))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<CardioConfig, CardioError> {
    match path {
        Some(p) => CardioConfig::load(p),
        None => Ok(CardioConfig::default()),
    }
}

fn run_predict(args: &PredictArgs, input: &mut dyn BufRead, out: &mut dyn Write) -> i32 {
    let config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_ARTIFACTS;
        }
    };
    let paths = config.artifact_paths(args.model.clone(), args.scaler.clone());

    // artifacts load before any patient data is collected
    let adapter = match paths.load() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_ARTIFACTS;
        }
    };

    let mut record = match args.patient.record() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_INVALID_INPUT;
        }
    };
    if args.interactive {
        record = match prompt::prompt_record(input, out, record) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("error: {e}");
                return EXIT_INVALID_INPUT;
            }
        };
    }
    if let Err(e) = form::validate(&record) {
        eprintln!("error: {e}");
        return EXIT_INVALID_INPUT;
    }

    let assessment = adapter.assess_record(&record);
    log::info!("features: {:?}", assessment.features.as_slice());

    let format = if args.json {
        OutputFormat::Json
    } else {
        config.output.format
    };
    let written = match format {
        OutputFormat::Text => writeln!(out, "{assessment}"),
        OutputFormat::Json => match serde_json::to_string_pretty(&assessment) {
            Ok(s) => writeln!(out, "{s}"),
            Err(e) => {
                eprintln!("error: {e}");
                return EXIT_INVALID_INPUT;
            }
        },
    };
    if let Err(e) = written {
        eprintln!("error: {e}");
        return EXIT_INVALID_INPUT;
    }
    0
}

fn run_encode(args: &EncodeArgs, out: &mut dyn Write) -> i32 {
    let record = match args.patient.record() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_INVALID_INPUT;
        }
    };
    if let Err(e) = form::validate(&record) {
        eprintln!("error: {e}");
        return EXIT_INVALID_INPUT;
    }
    let vector = encode(&record);
    let written = if args.json {
        let map: serde_json::Map<String, serde_json::Value> = vector
            .iter()
            .map(|(f, v)| (f.name().to_string(), serde_json::Value::from(v)))
            .collect();
        writeln!(out, "{}", serde_json::Value::Object(map))
    } else {
        vector
            .iter()
            .try_for_each(|(f, v)| writeln!(out, "{}={v}", f.name()))
    };
    match written {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("error: {e}");
            EXIT_INVALID_INPUT
        }
    }
}

fn run_form(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}", form::TITLE)?;
    writeln!(out, "{}", form::SUBTITLE)?;
    writeln!(out)?;
    writeln!(out, "Instructions:")?;
    for line in form::INSTRUCTIONS {
        writeln!(out, "  - {line}")?;
    }
    writeln!(out)?;
    writeln!(out, "{:<34} {:<26} {:<14} Default", "Field", "Flag", "Domain")?;
    for spec in &FORM_FIELDS {
        writeln!(
            out,
            "{:<34} {:<26} {:<14} {}",
            spec.label,
            format!("--{}", spec.feature.name().replace('_', "-")),
            spec.domain(),
            spec.default_text()
        )?;
    }
    Ok(())
}

fn run_cli() -> i32 {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Predict(args) => run_predict(&args, &mut stdin.lock(), &mut out),
        Command::Encode(args) => run_encode(&args, &mut out),
        Command::Form => match run_form(&mut out) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("error: {e}");
                EXIT_INVALID_INPUT
            }
        },
    }
}

fn main() {
    std::process::exit(run_cli());
}
