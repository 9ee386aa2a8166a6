//! Command handlers. Output goes to stdout; failures come back as `Error`.

use std::future::Future;
use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;
use vetclinic_client::api::{BookingBackend, PortalApi};
use vetclinic_client::{
    ApiResult, AppContext, AuthOutcome, BookingController, ClientConfig, ListView,
};
use vetclinic_core::models::auth::RegisterRequest;
use vetclinic_core::session::SessionDomain;

use crate::cli::{AdminCommand, BookArgs, Deletable, PortalCommand, Resource, SlotArgs};
use crate::{Error, Result};

pub fn context(api_url: Option<&str>, state_dir: Option<PathBuf>) -> Result<AppContext> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = api_url {
        config.set_api_url(url)?;
    }
    if let Some(dir) = state_dir {
        config.state_dir = dir;
    }
    log::debug!("api root {}", config.api_base_url);
    Ok(AppContext::open(config)?)
}

pub async fn admin(ctx: &AppContext, command: AdminCommand) -> Result<()> {
    match command {
        AdminCommand::Login { username, password } => {
            signed_in(ctx.admin.login(&username, &password).await)?
        }
        AdminCommand::Whoami => match ctx.admin.init().await {
            Some(user) => print_json(&user)?,
            None => return Err(not_signed_in(SessionDomain::Admin)),
        },
        AdminCommand::Logout => {
            let route = ctx.admin.logout().await?;
            println!("Signed out. Sign in again at {}", route.path());
        }
        AdminCommand::List { resource } => list(ctx, resource).await?,
        AdminCommand::Delete { resource, id } => {
            let api = &ctx.admin_api;
            let mut view: ListView<()> = ListView::new();
            let deleted = match resource {
                Deletable::Clients => view.mutate(api.clients.delete(id), "Client deleted").await?,
                Deletable::Pets => view.mutate(api.pets.records.delete(id), "Pet deleted").await?,
                Deletable::Inventory => {
                    view.mutate(api.inventory.records.delete(id), "Item deleted").await?
                }
            };
            if let Some(notice) = view.take_notice() {
                if !deleted {
                    return Err(Error::Custom(notice.message().to_string()));
                }
                println!("{}", notice.message());
            }
        }
        AdminCommand::Appointments { date } => {
            show(ctx.admin_api.appointments.on_date(date)).await?
        }
    }
    Ok(())
}

async fn list(ctx: &AppContext, resource: Resource) -> Result<()> {
    let api = &ctx.admin_api;
    match resource {
        Resource::Clients => show(api.clients.list()).await,
        Resource::Pets => show(api.pets.records.list()).await,
        Resource::Appointments => show(api.appointments.records.list()).await,
        Resource::Veterinarians => show(api.appointments.veterinarians()).await,
        Resource::Inventory => show(api.inventory.records.list()).await,
        Resource::LowStock => show(api.inventory.low_stock()).await,
        Resource::Invoices => show(api.invoices.records.list()).await,
        Resource::Plans => show(api.plans.list()).await,
        Resource::Subscriptions => show(api.subscriptions.list()).await,
        Resource::UpcomingVaccinations => show(api.vaccinations.upcoming()).await,
    }
}

pub async fn portal(ctx: &AppContext, command: PortalCommand) -> Result<()> {
    match command {
        PortalCommand::Login { email, password } => {
            signed_in(ctx.portal.login(&email, &password).await)?
        }
        PortalCommand::Register {
            name,
            email,
            phone,
            password,
        } => {
            let request = RegisterRequest {
                name,
                email,
                phone,
                password,
            };
            signed_in(ctx.portal.register(&request).await)?
        }
        PortalCommand::Profile => match ctx.portal.init().await {
            Some(profile) => print_json(&profile)?,
            None => return Err(not_signed_in(SessionDomain::Portal)),
        },
        PortalCommand::Logout => {
            let route = ctx.portal.logout().await?;
            println!("Signed out. Sign in again at {}", route.path());
        }
        PortalCommand::Slots(args) => {
            let booking = open_booking(&ctx.portal_api, &args).await?;
            for slot in booking.slots() {
                let state = if slot.available { "available" } else { "taken" };
                println!("{}-{} {state}", slot.start.format("%H:%M"), slot.end.format("%H:%M"));
            }
        }
        PortalCommand::Book(args) => book(ctx, args).await?,
        PortalCommand::Cancel { id, yes } => {
            let appointment = ctx.portal_api.appointments.get(id).await?;
            let mut booking = BookingController::new(ctx.portal_api.clone());
            if booking.cancel_appointment(&appointment, |_| yes).await? {
                println!("Appointment {id} cancelled");
                ctx.portal_changed().await;
            } else if let Some(notice) = booking.take_notice() {
                return Err(Error::Custom(notice.message().to_string()));
            } else {
                println!("Not cancelled. Pass --yes to cancel appointment {id}");
            }
        }
        PortalCommand::Plans => show(ctx.portal_api.plans()).await?,
    }
    Ok(())
}

/// Open the booking form keyed on `args` and load its availability.
async fn open_booking(api: &PortalApi, args: &SlotArgs) -> Result<BookingController<PortalApi>> {
    let mut booking = BookingController::new(api.clone());
    match args.appointment {
        Some(id) => {
            let appointment = api.appointments.get(id).await?;
            if !booking.open_edit(&appointment) {
                return Err(notice_error(&mut booking));
            }
        }
        None => booking.open_new(),
    }

    let state = booking.state_mut();
    state.set_vet(Some(args.vet));
    state.set_date(Some(args.date));
    state.set_duration(Some(args.duration));

    booking.refresh_availability().await?;
    if booking.notice().is_some_and(|n| n.is_error()) {
        return Err(notice_error(&mut booking));
    }
    Ok(booking)
}

async fn book(ctx: &AppContext, args: BookArgs) -> Result<()> {
    let mut booking = open_booking(&ctx.portal_api, &args.slot).await?;

    let state = booking.state_mut();
    state.set_pet(Some(args.pet));
    state.set_reason(args.reason);
    state.set_kind(args.kind);
    state.set_notes(args.notes.unwrap_or_default());

    if !booking.select_slot(args.time) {
        return Err(Error::Custom(format!(
            "{} is not an available slot",
            args.time.format("%H:%M")
        )));
    }

    match booking.submit().await? {
        Some(appointment) => {
            print_json(&appointment)?;
            ctx.portal_changed().await;
            Ok(())
        }
        None => Err(notice_error(&mut booking)),
    }
}

fn notice_error<B: BookingBackend>(booking: &mut BookingController<B>) -> Error {
    let message = booking
        .take_notice()
        .map(|n| n.message().to_string())
        .unwrap_or_else(|| vetclinic_client::error::GENERIC_MESSAGE.to_string());
    Error::Custom(message)
}

fn signed_in(outcome: AuthOutcome) -> Result<()> {
    match outcome {
        AuthOutcome::Success(user) => {
            println!("Signed in as {}", user.name);
            Ok(())
        }
        AuthOutcome::Failed { message } => Err(Error::Custom(message)),
    }
}

fn not_signed_in(domain: SessionDomain) -> Error {
    Error::Custom(format!(
        "Not signed in. Sign in at {}",
        domain.login_route().path()
    ))
}

/// Load a list through a view so failures surface as its notice.
async fn show<T: Serialize>(fetch: impl Future<Output = ApiResult<Vec<T>>>) -> Result<()> {
    let mut view = ListView::new();
    view.load(fetch).await?;
    if let Some(notice) = view.take_notice() {
        return Err(Error::Custom(notice.message().to_string()));
    }
    print_json(view.items())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
