//! backstop - Catcher training coach

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::{Duration, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use backstop::assessment::{
    AnalysisResponse, Assessment, AssessmentAnalysis, AssessmentAnalyzer, RawAssessment,
};
use backstop::config::CoachConfig;
use backstop::session::{CompletionReport, Session, SessionExecutor};
use backstop::skills::Category;
use backstop::tips::{
    format_tip, get_random_tip, get_random_tip_by_category, tip_for_focus, TipCategory,
};
use backstop::workout::{
    GenerationRequest, GenerationResponse, Preferences, UserProfile, WorkoutGenerator, WorkoutPlan,
};

#[derive(Parser)]
#[command(name = "backstop")]
#[command(author, version, about = "Catcher skills assessment and practice planner")]
struct Cli {
    /// Coach config JSON replacing the built-in tables
    #[arg(long, global = true, env = "BACKSTOP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List skill codes, weights and proficiency levels
    Skills,

    /// Analyze a skills assessment
    Analyze {
        /// Skill score as code=value (repeat for all 13 skills)
        #[arg(short, long = "score", value_parser = parse_score)]
        scores: Vec<(String, String)>,

        /// Previous score as code=value, for progress
        #[arg(short, long = "previous", value_parser = parse_score)]
        previous: Vec<(String, String)>,

        /// Days between the previous and current assessment
        #[arg(short, long, default_value = "30")]
        days: i64,

        /// Assessment id echoed in the result
        #[arg(long)]
        id: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a practice plan
    Plan(PlanArgs),

    /// Generate a plan and run it through a session, completing every drill
    Simulate(PlanArgs),

    /// Show a random coaching tip
    Tip {
        /// receiving, throwing, blocking, game_calling, mindset or conditioning
        category: Option<String>,
    },
}

#[derive(Args)]
struct PlanArgs {
    /// Skill score as code=value; missing skills default to 5
    #[arg(short, long = "score", value_parser = parse_score)]
    scores: Vec<(String, String)>,

    /// Session length in minutes, 1 to 1440
    #[arg(short, long, env = "BACKSTOP_DURATION", default_value = "45")]
    duration: u32,

    /// Available equipment, comma separated
    #[arg(short, long, env = "BACKSTOP_EQUIPMENT", value_delimiter = ',')]
    equipment: Vec<String>,

    /// Years of catching experience
    #[arg(short, long, default_value = "0")]
    years: u32,

    /// Focus category instead of the weakest one
    #[arg(long)]
    focus: Option<Category>,

    /// Leave out video review
    #[arg(long)]
    no_video: bool,

    /// Leave out cooldown
    #[arg(long)]
    no_cooldown: bool,

    /// Print JSON
    #[arg(long)]
    json: bool,
}

fn parse_score(s: &str) -> Result<(String, String), String> {
    let (code, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected code=value, got '{}'", s))?;
    Ok((code.trim().to_string(), value.trim().to_string()))
}

fn raw_assessment(id: Option<String>, scores: &[(String, String)]) -> RawAssessment {
    let scores: BTreeMap<String, serde_json::Value> = scores
        .iter()
        .map(|(code, value)| (code.clone(), serde_json::Value::String(value.clone())))
        .collect();
    RawAssessment { id, scores, taken_at: Some(Utc::now()), ..Default::default() }
}

fn load_config(path: Option<&PathBuf>) -> Result<CoachConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            let config = CoachConfig::from_json(&json).map_err(|e| anyhow!(e))?;
            info!("Loaded coach config from {}", path.display());
            Ok(config)
        }
        None => Ok(CoachConfig::default()),
    }
}

fn generation_request(args: &PlanArgs) -> GenerationRequest {
    let scores = if args.scores.is_empty() {
        None
    } else {
        Some(raw_assessment(None, &args.scores).scores_or_default())
    };
    GenerationRequest {
        profile: UserProfile { age: None, years_experience: args.years },
        scores,
        equipment: args.equipment.clone(),
        duration_minutes: args.duration,
        preferences: Preferences {
            focus_category: args.focus,
            include_video_review: !args.no_video,
            include_cooldown: !args.no_cooldown,
        },
    }
}

fn print_skills(config: &CoachConfig) {
    println!("Skills");
    println!("{:-<60}", "");
    for def in &config.skills.categories {
        println!("{} (importance {:.2})", def.category.label(), def.importance_weight);
        for skill in &def.skills {
            println!("  {:28} {:24} x{:.1}", skill.skill.code(), skill.skill.label(), skill.weight);
        }
    }
    println!();
    println!("Proficiency");
    println!("{:-<60}", "");
    for level in &config.skills.proficiency {
        println!("{:>2}  {:18} {}", level.score, level.label, level.description);
    }
}

fn print_analysis(analysis: &AssessmentAnalysis) {
    let b = &analysis.breakdown;
    println!("Overall: {:.1} ({})", b.overall_average, b.overall_proficiency);
    println!("{:-<60}", "");
    for c in &b.categories {
        println!(
            "{:10} {:>4.1}  {:18} potential +{:.1}",
            c.category.label(),
            c.average,
            c.proficiency,
            c.improvement_potential
        );
    }

    let s = &analysis.strengths;
    println!();
    println!("Strongest: {}  Weakest: {}", s.strongest_category, s.weakest_category);
    for r in &s.critical_areas {
        println!("  critical: {} ({})", r.skill.label(), r.score);
    }

    let r = &analysis.recommendations;
    println!();
    println!(
        "Focus: {} - {} ({})",
        r.primary_focus.category.label(),
        r.primary_focus.time_share,
        r.primary_focus.reason
    );
    for f in &r.secondary_focuses {
        println!("  also: {} - {}", f.category.label(), f.time_share);
    }
    println!(
        "Train {}x/week, {} min: {}",
        r.training_frequency.sessions_per_week,
        r.training_frequency.session_minutes,
        r.training_frequency.advice
    );

    if let Some(p) = &analysis.progress {
        println!();
        println!(
            "Progress over {} days: {:+.1} ({:+.3}/day)",
            p.elapsed_days, p.overall_improvement, p.improvement_rate
        );
        for c in &p.categories {
            println!("  {:10} {:+.1} {:?}", c.category.label(), c.change, c.trend);
        }
    }

    for flag in &analysis.warning_flags {
        println!("Warning: {:?}", flag);
    }
}

fn print_plan(plan: &WorkoutPlan) {
    println!("{}", plan.title);
    println!(
        "Tier: {} | Level: {} | Focus: {} | Strongest: {}",
        plan.equipment_tier,
        plan.experience_level.name(),
        plan.focus_category,
        plan.strongest_category
    );
    println!("{:-<60}", "");
    for phase in &plan.phases {
        println!("{} ({} min)", phase.title, phase.total_duration);
        for drill in &phase.drills {
            println!("  {:>2} min  {}", drill.duration_minutes, drill.name);
        }
    }
}

fn print_report(report: &CompletionReport) {
    let s = &report.stats;
    println!("Session {} complete", report.session_id);
    println!("{:-<60}", "");
    println!(
        "Drills: {}/{} completed, {} skipped ({:.1}%)",
        s.drills_completed, s.planned_drills, s.drills_skipped, s.completion_rate
    );
    println!("Phases: {}/{}", s.phases_completed, s.total_phases);
    println!("Time: {} min (planned {})", s.actual_minutes, s.planned_minutes);
    for badge in &report.achievements {
        println!("🏅 {} - {}", badge.name, badge.description);
    }
    for tip in &report.suggestions {
        println!("→ {}", tip);
    }
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Skills => print_skills(&config),

        Commands::Analyze { scores, previous, days, id, json } => {
            let analyzer = AssessmentAnalyzer::from_config(&config);
            let raw = raw_assessment(id, &scores);
            let previous = (!previous.is_empty()).then(|| {
                let scores = raw_assessment(None, &previous).scores_or_default();
                Assessment::new(scores, Utc::now() - Duration::days(days))
            });

            let result = analyzer.analyze(&raw, previous.as_ref());
            if json {
                let response = AnalysisResponse::from(result);
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                match result {
                    Ok(analysis) => print_analysis(&analysis),
                    Err(failure) => println!("{}", failure),
                }
            }
        }

        Commands::Plan(args) => {
            let generator = WorkoutGenerator::new(&config);
            let response = GenerationResponse::from(generator.generate(&generation_request(&args)));
            if args.json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                if let Some(error) = &response.error {
                    println!("Could not build a plan ({}), showing fallback", error);
                }
                print_plan(&response.plan);
                if let Some(tip) = tip_for_focus(response.plan.focus_category) {
                    println!();
                    println!("{}", format_tip(tip));
                }
            }
        }

        Commands::Simulate(args) => {
            let generator = WorkoutGenerator::new(&config);
            let plan = GenerationResponse::from(generator.generate(&generation_request(&args))).plan;

            let mut executor = SessionExecutor::new();
            executor.events_mut().subscribe_all(|event| {
                info!("event: {}", serde_json::to_string(event).unwrap_or_default());
                Ok(())
            });

            let mut session = Session::new(format!("sim-{}", Utc::now().timestamp()), &plan);
            executor.start(&mut session)?;
            while session.current_drill().is_some() {
                executor.complete_drill(&mut session, None)?;
            }

            let report = session
                .report
                .as_ref()
                .ok_or_else(|| anyhow!("session finished without a report"))?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(report)?);
            } else {
                print_plan(&plan);
                println!();
                print_report(report);
            }
        }

        Commands::Tip { category } => {
            let tip = match category {
                Some(name) => {
                    let category: TipCategory = name.parse().map_err(|e: String| anyhow!(e))?;
                    get_random_tip_by_category(category)
                        .ok_or_else(|| anyhow!("No tips for {}", category.name()))?
                }
                None => get_random_tip().ok_or_else(|| anyhow!("No tips available"))?,
            };
            println!("{}", format_tip(tip));
        }
    }

    Ok(())
}
