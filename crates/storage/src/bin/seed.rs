use std::fmt;
use std::path::PathBuf;

use quiz_core::model::{Difficulty, Question, QuestionBank, TopicId, TopicSummary};
use storage::json::write_catalog;

#[derive(Debug, Clone)]
struct Args {
    dir: PathBuf,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDir { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDir { raw } => write!(f, "invalid --dir value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut dir = std::env::var("QUIZ_DIR").unwrap_or_else(|_| "quizzes".into());

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--dir" => {
                    let value = require_value(&mut args, "--dir")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDir { raw: value });
                    }
                    dir = value;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { dir: dir.into() })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --dir <path>              Quiz catalog directory (default: quizzes)");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  QUIZ_DIR");
}

type Row = (&'static str, [&'static str; 4], u8, &'static str);

const GEOGRAPHY_EASY: &[Row] = &[
    ("What is the capital of France?", ["Berlin", "Paris", "Madrid", "Rome"], 1, "Paris has been the capital since the 10th century."),
    ("Which ocean is the largest?", ["Atlantic", "Indian", "Arctic", "Pacific"], 3, "The Pacific covers about a third of the planet."),
    ("On which continent is Kenya?", ["Africa", "Asia", "Europe", "South America"], 0, "Kenya lies in East Africa."),
    ("Which river flows through Cairo?", ["Amazon", "Danube", "Nile", "Thames"], 2, "The Nile runs north through Cairo to the Mediterranean."),
    ("What is the capital of Japan?", ["Kyoto", "Osaka", "Tokyo", "Nagoya"], 2, "Tokyo became the capital in 1868."),
    ("Which country has the most people?", ["India", "USA", "Brazil", "Russia"], 0, "India passed China in 2023."),
    ("Mount Everest sits on the border of Nepal and which country?", ["India", "China", "Bhutan", "Pakistan"], 1, "The summit straddles Nepal and China."),
    ("What is the smallest country in the world?", ["Monaco", "Malta", "Vatican City", "San Marino"], 2, "Vatican City covers about 0.44 square kilometres."),
    ("Which desert is the largest hot desert?", ["Gobi", "Kalahari", "Sahara", "Mojave"], 2, "The Sahara spans most of North Africa."),
    ("What is the capital of Canada?", ["Toronto", "Ottawa", "Vancouver", "Montreal"], 1, "Ottawa was chosen by Queen Victoria in 1857."),
];

const SCIENCE_EASY: &[Row] = &[
    ("What gas do plants absorb from the air?", ["Oxygen", "Nitrogen", "Carbon dioxide", "Helium"], 2, "Photosynthesis turns CO2 and water into sugar."),
    ("What is H2O?", ["Salt", "Water", "Hydrogen peroxide", "Ozone"], 1, "Two hydrogen atoms and one oxygen atom."),
    ("Which planet is known as the Red Planet?", ["Venus", "Jupiter", "Mars", "Mercury"], 2, "Iron oxide on its surface gives Mars its colour."),
    ("How many bones are in the adult human body?", ["106", "206", "306", "186"], 1, "Babies start with around 300 that fuse over time."),
    ("What force keeps us on the ground?", ["Magnetism", "Friction", "Gravity", "Inertia"], 2, "Gravity pulls masses toward each other."),
];

const SCIENCE_HARD: &[Row] = &[
    ("What is the atomic number of carbon?", ["4", "6", "8", "12"], 1, "Carbon has six protons."),
    ("Which particle carries no electric charge?", ["Proton", "Electron", "Neutron", "Positron"], 2, "Neutrons are electrically neutral."),
    ("What is the powerhouse of the cell?", ["Nucleus", "Ribosome", "Mitochondrion", "Golgi body"], 2, "Mitochondria produce most of the cell's ATP."),
];

fn questions(rows: &[Row]) -> Result<Vec<Question>, quiz_core::Error> {
    rows.iter()
        .map(|(prompt, answers, correct, explanation)| {
            let answers = answers.iter().map(|a| (*a).to_owned()).collect();
            Question::new(*prompt, answers, *correct, *explanation).map_err(quiz_core::Error::from)
        })
        .collect()
}

fn sample_catalog() -> Result<Vec<(TopicSummary, QuestionBank)>, quiz_core::Error> {
    let easy = Difficulty::new("easy")?;
    let hard = Difficulty::new("hard")?;
    Ok(vec![
        (
            TopicSummary {
                id: TopicId::new("geography")?,
                display_name: "Geography".into(),
                description: "Capitals, rivers and the odd desert".into(),
            },
            QuestionBank::new().with_set(easy.clone(), questions(GEOGRAPHY_EASY)?),
        ),
        (
            TopicSummary {
                id: TopicId::new("science")?,
                display_name: "Science".into(),
                description: "Planets, particles and photosynthesis".into(),
            },
            QuestionBank::new()
                .with_set(easy, questions(SCIENCE_EASY)?)
                .with_set(hard, questions(SCIENCE_HARD)?),
        ),
    ])
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let catalog = sample_catalog()?;
    write_catalog(&args.dir, &catalog).await?;

    println!(
        "Seeded {} topics into {}",
        catalog.len(),
        args.dir.display()
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
