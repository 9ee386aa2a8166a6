use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand, ValueEnum};
use vetclinic_core::models::Id;
use vetclinic_core::models::appointment::{AppointmentType, DEFAULT_DURATION_MINUTES};
use vetclinic_core::models::time;

#[derive(Parser, Debug)]
#[command(name = "vetclinic", about = "VetClinic command-line client", version)]
pub struct Cli {
    /// API root, e.g. http://localhost:3000/api.
    #[arg(long, global = true, env = "VETCLINIC_API_URL")]
    pub api_url: Option<String>,

    /// Directory holding the persisted sessions.
    #[arg(long, global = true, env = "VETCLINIC_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print version information.
    Version,

    /// Staff dashboard.
    #[command(subcommand)]
    Admin(AdminCommand),

    /// Customer portal.
    #[command(subcommand)]
    Portal(PortalCommand),
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Sign in with staff credentials.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "VETCLINIC_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show the signed-in staff user.
    Whoami,
    /// Sign out.
    Logout,
    /// List a resource as JSON.
    List {
        #[arg(value_enum)]
        resource: Resource,
    },
    /// Delete one record.
    Delete {
        #[arg(value_enum)]
        resource: Deletable,
        id: Id,
    },
    /// Appointments scheduled on one day.
    Appointments {
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    Clients,
    Pets,
    Appointments,
    Veterinarians,
    Inventory,
    LowStock,
    Invoices,
    Plans,
    Subscriptions,
    UpcomingVaccinations,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deletable {
    Clients,
    Pets,
    Inventory,
}

#[derive(Subcommand, Debug)]
pub enum PortalCommand {
    /// Sign in with customer credentials.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "VETCLINIC_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create a customer account and sign in.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long, env = "VETCLINIC_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show the customer profile.
    Profile,
    /// Sign out.
    Logout,
    /// Available slots for a vet and day.
    Slots(SlotArgs),
    /// Book a new appointment, or reschedule one with --appointment.
    Book(BookArgs),
    /// Cancel an appointment.
    Cancel {
        id: Id,
        /// Confirm the cancellation.
        #[arg(long)]
        yes: bool,
    },
    /// Subscription plans on offer.
    Plans,
}

#[derive(Args, Debug)]
pub struct SlotArgs {
    #[arg(long)]
    pub vet: Id,
    #[arg(long, value_parser = parse_date)]
    pub date: NaiveDate,
    #[arg(long, default_value_t = DEFAULT_DURATION_MINUTES)]
    pub duration: u32,
    /// Appointment being rescheduled; its own slot stays selectable.
    #[arg(long)]
    pub appointment: Option<Id>,
}

#[derive(Args, Debug)]
pub struct BookArgs {
    #[command(flatten)]
    pub slot: SlotArgs,
    #[arg(long)]
    pub pet: Id,
    #[arg(long, value_parser = parse_time)]
    pub time: NaiveTime,
    #[arg(long)]
    pub reason: String,
    #[arg(long = "type", value_parser = parse_kind, default_value = "consulta")]
    pub kind: AppointmentType,
    #[arg(long)]
    pub notes: Option<String>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    time::parse(raw).ok_or_else(|| format!("expected HH:MM, got {raw}"))
}

fn parse_kind(raw: &str) -> Result<AppointmentType, String> {
    Ok(AppointmentType::from(raw.to_lowercase()))
}
