//! FitFusion CLI - log in, manage records and read summaries from a terminal

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use time::{Date, OffsetDateTime};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use fitfusion::{
    auth::dto::{LoginRequest, SignupRequest},
    client::{
        dashboard::{calories_on, days_remaining, split_goals, summarize_workouts},
        ApiClient, FormModel, ResourceApi, ResourcePage, Route, RouteGuard, Session,
        SessionStore, SubmitState, ToastKind,
    },
    dates::{format_date, parse_date},
    goals::Goal,
    meals::Meal,
    trainers::Trainer,
    users::User,
    workouts::Workout,
};

/// FitFusion CLI - track workouts, meals, goals and trainers
#[derive(Parser, Debug)]
#[command(name = "fitfusion-cli")]
#[command(about = "Command-line client for the FitFusion API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the API
    #[arg(long, env = "FITFUSION_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an account
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in and remember the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the session token
    Logout,
    /// Current weather for a city
    Weather {
        city: String,
    },
    /// Workout, meal and goal summaries
    Dashboard {
        /// Day for the calorie total (YYYY-MM-DD), defaults to today
        #[arg(long)]
        day: Option<String>,
    },
    /// Manage users
    Users {
        #[command(subcommand)]
        action: ResourceAction,
    },
    /// Manage workouts
    Workouts {
        #[command(subcommand)]
        action: ResourceAction,
    },
    /// Manage meals
    Meals {
        #[command(subcommand)]
        action: ResourceAction,
    },
    /// Manage goals
    Goals {
        #[command(subcommand)]
        action: ResourceAction,
    },
    /// Manage trainers
    Trainers {
        #[command(subcommand)]
        action: ResourceAction,
    },
}

#[derive(Subcommand, Debug)]
enum ResourceAction {
    /// List all records
    List,
    /// Create a record from key=value fields (e.g. type=Cardio duration=30)
    Add {
        #[arg(value_parser = parse_field)]
        fields: Vec<(String, Value)>,
    },
    /// Update a record; fields not given keep their current value
    Edit {
        id: Uuid,
        #[arg(value_parser = parse_field)]
        fields: Vec<(String, Value)>,
    },
    /// Delete a record
    Delete {
        id: Uuid,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

impl Commands {
    fn route(&self) -> Route {
        match self {
            Commands::Signup { .. } => Route::Signup,
            Commands::Login { .. } | Commands::Logout => Route::Login,
            Commands::Weather { .. } => Route::Weather,
            Commands::Dashboard { .. } => Route::Home,
            Commands::Users { .. } => Route::Users,
            Commands::Workouts { .. } => Route::Workouts,
            Commands::Meals { .. } => Route::Meals,
            Commands::Goals { .. } => Route::Goals,
            Commands::Trainers { .. } => Route::Trainers,
        }
    }
}

/// `key=value`; the value is read as JSON when it parses, else as a string.
fn parse_field(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))?;
    if key.is_empty() {
        return Err(format!("empty field name in `{raw}`"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cli.log_level))
        .with_writer(std::io::stderr)
        .init();

    let store = SessionStore::new()?;
    let session = store.load()?;

    let route = cli.command.route();
    if RouteGuard::resolve(route, session.as_ref()) != route {
        bail!("Not logged in. Run `fitfusion-cli login` first.");
    }

    let client = ApiClient::new(&cli.api_url).with_token(session.map(|s| s.token));

    match cli.command {
        Commands::Signup {
            name,
            email,
            password,
        } => {
            let resp = client
                .signup(&SignupRequest {
                    name,
                    email,
                    password,
                })
                .await?;
            println!("{}", resp.message);
        }
        Commands::Login { email, password } => {
            let resp = client.login(&LoginRequest { email, password }).await?;
            println!("Logged in as {} <{}>", resp.user.name, resp.user.email);
            store.save(&Session {
                token: resp.token,
                user: Some(resp.user),
            })?;
        }
        Commands::Logout => {
            store.clear()?;
            println!("Logged out");
        }
        Commands::Weather { city } => {
            let w = client.weather(&city).await?;
            println!(
                "{}: {:.1}°C, {} (humidity {}%, wind {:.1} m/s)",
                w.city, w.temperature, w.description, w.humidity, w.wind_speed
            );
        }
        Commands::Dashboard { day } => dashboard(&client, day).await?,
        Commands::Users { action } => run::<User>(client, action).await?,
        Commands::Workouts { action } => run::<Workout>(client, action).await?,
        Commands::Meals { action } => run::<Meal>(client, action).await?,
        Commands::Goals { action } => run::<Goal>(client, action).await?,
        Commands::Trainers { action } => run::<Trainer>(client, action).await?,
    }

    Ok(())
}

async fn dashboard(client: &ApiClient, day: Option<String>) -> Result<()> {
    let today = OffsetDateTime::now_utc().date();
    let day: Date = match day {
        Some(raw) => parse_date(&raw).context("--day must be YYYY-MM-DD")?,
        None => today,
    };

    let workouts: Vec<Workout> = ResourceApi::<Workout>::list(client).await?;
    let meals: Vec<Meal> = ResourceApi::<Meal>::list(client).await?;
    let goals: Vec<Goal> = ResourceApi::<Goal>::list(client).await?;

    let summary = summarize_workouts(&workouts);
    println!("Workouts: {} total minutes", summary.total_minutes);
    for (kind, count) in &summary.by_type {
        println!("  {kind}: {count}");
    }

    println!("Calories on {}: {}", format_date(day), calories_on(&meals, day));

    let (active, past) = split_goals(&goals, today);
    println!("Goals: {} active, {} past", active.len(), past.len());
    for goal in active {
        println!(
            "  {:.1} kg by {} ({} days remaining)",
            goal.target_weight,
            format_date(goal.target_date),
            days_remaining(goal, today)
        );
    }
    Ok(())
}

async fn run<E: FormModel>(client: ApiClient, action: ResourceAction) -> Result<()> {
    let mut page = ResourcePage::<E>::new(Arc::new(client));
    page.mount().await;

    match action {
        ResourceAction::List => {
            println!("{}", serde_json::to_string_pretty(&page.items)?);
        }
        ResourceAction::Add { fields } => {
            let form = build_form::<E>(Map::new(), fields)?;
            page.submit(form).await;
        }
        ResourceAction::Edit { id, fields } => {
            let record = page
                .items
                .iter()
                .find(|r| r.id() == id)
                .cloned()
                .with_context(|| format!("No {} with id {id}", E::NAME))?;
            page.edit(&record);
            let prefilled = match serde_json::to_value(page.form.as_ref())? {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            let form = build_form::<E>(prefilled, fields)?;
            page.submit(form).await;
        }
        ResourceAction::Delete { id, yes } => {
            if !page.delete(id, yes).await && !yes {
                println!("Not deleted; pass --yes to confirm.");
            }
        }
    }

    for toast in &page.toasts {
        match toast.kind {
            ToastKind::Success => println!("{}", toast.message),
            ToastKind::Error => eprintln!("error: {}", toast.message),
        }
    }
    if let SubmitState::Failed(reason) = &page.submit {
        bail!("{reason}");
    }
    Ok(())
}

fn build_form<E: FormModel>(mut base: Map<String, Value>, fields: Vec<(String, Value)>) -> Result<E::Create> {
    for (key, value) in fields {
        base.insert(key, value);
    }
    serde_json::from_value(Value::Object(base)).with_context(|| format!("Invalid {} fields", E::NAME))
}
