//! Agenda CLI - therapy clinic appointment booking

use agenda_core::config::Config;
use agenda_core::domain::clients::{ClientService, NewClient};
use agenda_core::domain::datetime;
use agenda_core::domain::scheduling::{Actor, BookingService, NewAppointment};
use agenda_core::domain::treatments::{Treatment, TreatmentService};
use agenda_core::domain::users::{Role, SystemUser, UserRepository};
use agenda_core::storage::Database;
use chrono::{Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "agenda")]
#[command(author, version, about = "Appointment booking for a therapy clinic", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Role to act under (admin, massoterapeuta, cliente)
    #[arg(long, global = true, default_value = "admin")]
    role: String,

    /// Identity of the acting user or client
    #[arg(long, global = true)]
    actor: Option<Uuid>,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, Default, PartialEq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage clients
    Clients {
        #[command(subcommand)]
        action: ClientAction,
    },

    /// Manage treatments
    Treatments {
        #[command(subcommand)]
        action: TreatmentAction,
    },

    /// Manage practitioners
    Practitioners {
        #[command(subcommand)]
        action: PractitionerAction,
    },

    /// Book an appointment
    Book {
        /// Client ID
        client: Uuid,
        /// Treatment ID
        treatment: Uuid,
        /// Practitioner ID
        practitioner: Uuid,
        /// Start time (RFC 3339 or YYYY-MM-DDTHH:MM:SS)
        start: String,
        /// Charged amount (defaults to the treatment price)
        #[arg(long)]
        amount: Option<f64>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// List appointments
    Agenda {
        /// Only appointments on this day (YYYY-MM-DD)
        #[arg(long)]
        day: Option<String>,
        /// Only appointments in this status
        #[arg(long)]
        status: Option<String>,
        /// Only appointments of this practitioner
        #[arg(long)]
        practitioner: Option<Uuid>,
    },

    /// Change an appointment's status
    Status {
        /// Appointment ID
        id: Uuid,
        /// New status (agendado, confirmado, realizado, cancelado,
        /// reagendamento_solicitado)
        status: String,
    },

    /// Request a reschedule for an appointment
    Reschedule {
        /// Appointment ID
        id: Uuid,
        /// Client the request is made for
        #[arg(long)]
        client: Uuid,
    },

    /// Permanently delete an appointment
    Delete {
        /// Appointment ID
        id: Uuid,
        #[arg(long)]
        force: bool,
    },

    /// Run health check
    Doctor,
}

#[derive(Subcommand)]
enum ClientAction {
    /// Register a client
    Add {
        /// Full name
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Birth date (YYYY-MM-DD or DD/MM/YYYY)
        #[arg(long)]
        birth_date: Option<String>,
    },
    /// List active clients
    List {
        /// Include deactivated clients
        #[arg(long)]
        all: bool,
        /// Filter by partial name
        #[arg(long)]
        name: Option<String>,
    },
    /// Show client details
    Show { id: Uuid },
    /// Deactivate a client
    Remove { id: Uuid },
}

#[derive(Subcommand)]
enum TreatmentAction {
    /// Register a treatment
    Add {
        /// Treatment name
        name: String,
        /// Duration in minutes
        #[arg(long)]
        minutes: i64,
        /// Price
        #[arg(long)]
        price: f64,
    },
    /// List treatments
    List,
    /// Delete a treatment
    Remove { id: Uuid },
}

#[derive(Subcommand)]
enum PractitionerAction {
    /// Register a practitioner
    Add {
        /// Full name
        name: String,
        #[arg(long)]
        email: String,
    },
    /// List system users
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries only command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("agenda=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let actor = resolve_actor(&cli)?;

    let config = Config::load()?;
    let db = Database::new(config.database_config()).await?;
    tracing::debug!(path = %db.config().path.display(), "database ready");

    match cli.command {
        Commands::Clients { action } => cmd_clients(&db, action, cli.format, cli.quiet).await,
        Commands::Treatments { action } => cmd_treatments(&db, action, cli.format, cli.quiet).await,
        Commands::Practitioners { action } => {
            cmd_practitioners(&db, action, cli.format, cli.quiet).await
        }
        Commands::Book {
            client,
            treatment,
            practitioner,
            start,
            amount,
            notes,
        } => {
            cmd_book(
                &db, &actor, client, treatment, practitioner, &start, amount, notes, cli.quiet,
            )
            .await
        }
        Commands::Agenda {
            day,
            status,
            practitioner,
        } => cmd_agenda(&db, day, status, practitioner, cli.format, cli.quiet).await,
        Commands::Status { id, status } => cmd_status(&db, &actor, id, &status, cli.quiet).await,
        Commands::Reschedule { id, client } => {
            cmd_reschedule(&db, &actor, id, client, cli.quiet).await
        }
        Commands::Delete { id, force } => cmd_delete(&db, &actor, id, force, cli.quiet).await,
        Commands::Doctor => cmd_doctor(&db, cli.quiet).await,
    }
}

/// Build the acting identity from the global flags.
///
/// The CLI defaults to an anonymous admin id; policy decisions that depend
/// on the actor's own id (client self-service) need `--actor`.
fn resolve_actor(cli: &Cli) -> anyhow::Result<Actor> {
    let role = Role::from_str(&cli.role)
        .ok_or_else(|| anyhow::anyhow!("unknown role '{}'", cli.role))?;
    Ok(Actor::new(cli.actor.unwrap_or_else(Uuid::new_v4), role))
}

async fn cmd_clients(
    db: &Database,
    action: ClientAction,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let clients = ClientService::new(db.pool().clone());
    match action {
        ClientAction::Add {
            name,
            email,
            phone,
            birth_date,
        } => {
            let mut input = NewClient::named(name);
            input.email = email;
            input.phone = phone;
            input.birth_date = birth_date
                .as_deref()
                .map(datetime::parse_flexible_date)
                .transpose()?;
            let client = clients.register(input).await?;
            if !quiet {
                println!("Client registered: {} ({})", client.full_name, client.id);
            }
        }
        ClientAction::List { all, name } => {
            let found = if let Some(name) = name {
                clients.by_name(&name).await?
            } else if all {
                clients.all().await?
            } else {
                clients.by_active(true).await?
            };
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else if found.is_empty() {
                if !quiet {
                    println!("No clients found.");
                }
            } else {
                for c in found {
                    let marker = if c.active { "" } else { " [inactive]" };
                    println!("  {} - {}{}", c.id, c.full_name, marker);
                }
            }
        }
        ClientAction::Show { id } => match clients.by_id(id).await? {
            Some(c) => {
                if format == OutputFormat::Json {
                    println!("{}", serde_json::to_string_pretty(&c)?);
                } else {
                    println!("Client: {}", c.full_name);
                    println!("  ID: {}", c.id);
                    if !c.email.is_empty() {
                        println!("  Email: {}", c.email);
                    }
                    if !c.phone.is_empty() {
                        println!("  Phone: {}", c.phone);
                    }
                    if let Some(birth) = c.birth_date {
                        println!("  Born: {}", birth);
                    }
                    println!("  Registered: {}", c.registered_at.format("%Y-%m-%d %H:%M"));
                    println!("  Active: {}", c.active);
                }
            }
            None => return Err(anyhow::anyhow!("Client '{}' not found.", id)),
        },
        ClientAction::Remove { id } => {
            clients.delete(id).await?;
            if !quiet {
                println!("Client '{}' deactivated.", id);
            }
        }
    }
    Ok(())
}

async fn cmd_treatments(
    db: &Database,
    action: TreatmentAction,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let treatments = TreatmentService::new(db.pool().clone());
    match action {
        TreatmentAction::Add {
            name,
            minutes,
            price,
        } => {
            let treatment = Treatment::new(name, minutes, price);
            treatments.create(&treatment).await?;
            if !quiet {
                println!(
                    "Treatment registered: {}, {} min, {:.2} ({})",
                    treatment.name, treatment.duration_minutes, treatment.price, treatment.id
                );
            }
        }
        TreatmentAction::List => {
            let found = treatments.all().await?;
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else if found.is_empty() {
                if !quiet {
                    println!("No treatments found.");
                }
            } else {
                for t in found {
                    println!(
                        "  {} - {} ({} min, {:.2})",
                        t.id, t.name, t.duration_minutes, t.price
                    );
                }
            }
        }
        TreatmentAction::Remove { id } => {
            treatments.delete(id).await?;
            if !quiet {
                println!("Treatment '{}' deleted.", id);
            }
        }
    }
    Ok(())
}

async fn cmd_practitioners(
    db: &Database,
    action: PractitionerAction,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let users = UserRepository::new(db.pool().clone());
    match action {
        PractitionerAction::Add { name, email } => {
            let user = SystemUser::new(name, email, Role::Practitioner);
            users.create(&user).await?;
            if !quiet {
                println!("Practitioner registered: {} ({})", user.full_name, user.id);
            }
        }
        PractitionerAction::List => {
            let found = users.find_all().await?;
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else if found.is_empty() {
                if !quiet {
                    println!("No users found.");
                }
            } else {
                for u in found {
                    println!("  {} - {} [{}]", u.id, u.full_name, u.role);
                }
            }
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn cmd_book(
    db: &Database,
    actor: &Actor,
    client: Uuid,
    treatment: Uuid,
    practitioner: Uuid,
    start: &str,
    amount: Option<f64>,
    notes: Option<String>,
    quiet: bool,
) -> anyhow::Result<()> {
    let booking = BookingService::with_pool(db.pool().clone());
    let start_at = datetime::parse_flexible(start)?;

    let mut input = NewAppointment::new(client, treatment, practitioner, start_at);
    input.charged_amount = amount;
    input.notes = notes;

    let appointment = booking.create(actor, input).await?;
    if !quiet {
        println!(
            "Appointment booked: {} at {}",
            appointment.id,
            appointment.start_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

async fn cmd_agenda(
    db: &Database,
    day: Option<String>,
    status: Option<String>,
    practitioner: Option<Uuid>,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let booking = BookingService::with_pool(db.pool().clone());

    let appointments = if let Some(day) = day {
        let date: NaiveDate = datetime::parse_flexible_date(&day)?;
        let start = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| anyhow::anyhow!("invalid day '{}'", day))?
            .and_utc();
        booking.by_period(start, start + Duration::days(1)).await?
    } else if let Some(label) = status {
        let status = agenda_core::domain::scheduling::AppointmentStatus::parse(&label)?;
        booking.by_status(status).await?
    } else if let Some(practitioner) = practitioner {
        booking.by_practitioner(practitioner).await?
    } else {
        booking.all().await?
    };

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&appointments)?);
    } else if appointments.is_empty() {
        if !quiet {
            println!("No appointments found.");
        }
    } else {
        for a in appointments {
            println!(
                "  {} - {} [{}] client={} practitioner={}",
                a.id,
                a.start_at.format("%Y-%m-%d %H:%M"),
                a.status,
                a.client_id,
                a.practitioner_id
            );
        }
    }
    Ok(())
}

async fn cmd_status(
    db: &Database,
    actor: &Actor,
    id: Uuid,
    status: &str,
    quiet: bool,
) -> anyhow::Result<()> {
    let booking = BookingService::with_pool(db.pool().clone());
    booking.change_status_label(actor, id, status).await?;
    if !quiet {
        println!("Appointment '{}' is now '{}'.", id, status);
    }
    Ok(())
}

async fn cmd_reschedule(
    db: &Database,
    actor: &Actor,
    id: Uuid,
    client: Uuid,
    quiet: bool,
) -> anyhow::Result<()> {
    let booking = BookingService::with_pool(db.pool().clone());
    booking.request_reschedule(actor, id, client).await?;
    if !quiet {
        println!("Reschedule requested for appointment '{}'.", id);
    }
    Ok(())
}

async fn cmd_delete(
    db: &Database,
    actor: &Actor,
    id: Uuid,
    force: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    if !force {
        if !quiet {
            println!("Warning: this permanently deletes appointment '{}'.", id);
            println!("Use --force to confirm deletion.");
        }
        return Ok(());
    }
    let booking = BookingService::with_pool(db.pool().clone());
    booking.delete(actor, id).await?;
    if !quiet {
        println!("Appointment '{}' deleted.", id);
    }
    Ok(())
}

async fn cmd_doctor(db: &Database, quiet: bool) -> anyhow::Result<()> {
    db.health_check().await?;
    if !quiet {
        println!("Database: ok ({})", db.config().path.display());
        let now = Utc::now();
        println!("Clock: {}", now.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_actor_roles() {
        let cli = Cli::parse_from(["agenda", "doctor"]);
        let actor = resolve_actor(&cli).unwrap();
        assert_eq!(actor.role, Some(Role::Admin));

        let cli = Cli::parse_from(["agenda", "--role", "cliente", "doctor"]);
        let actor = resolve_actor(&cli).unwrap();
        assert_eq!(actor.role, Some(Role::Client));

        let cli = Cli::parse_from(["agenda", "--role", "gerente", "doctor"]);
        assert!(resolve_actor(&cli).is_err());
    }

    #[test]
    fn test_actor_id_is_honored() {
        let id = Uuid::new_v4();
        let cli = Cli::parse_from(["agenda", "--actor", &id.to_string(), "doctor"]);
        let actor = resolve_actor(&cli).unwrap();
        assert_eq!(actor.id, id);
    }
}
