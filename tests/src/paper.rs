//! # Commercial Paper Chaincode
//!
//! A small but complete chaincode built on the kit, used by the
//! integration tests and benchmarks.
//!
//! | Function | Args | Effect |
//! |----------|------|--------|
//! | `init` | none | nothing, returns the contract name |
//! | `paper.issue` | issuer, number, face value, external id | insert + `PaperIssued` |
//! | `paper.buy` | issuer, number, current owner, new owner | put + `PaperBought` |
//! | `paper.redeem` | issuer, number, redeeming owner | put + `PaperRedeemed` |
//! | `paper.delete` | issuer, number | delete |
//! | `paper.get` | issuer, number | the paper |
//! | `paper.byExternalId` | external id | the paper |
//! | `paper.list` | none | every paper |
//! | `paper.listByIssuer` | issuer | papers of one issuer |

use cc_01_state_mapping::prelude::*;
use cc_02_router::prelude::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::impl_json_byteable;
use tracing::debug;

/// Lifecycle of a paper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperState {
    #[default]
    Issued,
    Trading,
    Redeemed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommercialPaper {
    pub issuer: String,
    pub number: String,
    pub owner: String,
    pub face_value: u64,
    pub external_id: String,
    pub state: PaperState,
    pub issued_at: Option<DateTime<Utc>>,
}

impl Validatable for CommercialPaper {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.owner.is_empty() {
            return Err(ValidationError::new("owner is required"));
        }
        if self.face_value == 0 {
            return Err(ValidationError::new("face value must be positive"));
        }
        Ok(())
    }
}

impl Entity for CommercialPaper {
    type List = EntityList<CommercialPaper>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperIssued {
    pub issuer: String,
    pub number: String,
    pub face_value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperBought {
    pub issuer: String,
    pub number: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRedeemed {
    pub issuer: String,
    pub number: String,
    pub by: String,
}

impl_json_byteable!(CommercialPaper, PaperIssued, PaperBought, PaperRedeemed);

/// No handler-level middleware.
const NONE: [Middleware; 0] = [];

/// Name of the unique external-id index.
pub const EXTERNAL_ID: &str = "ExternalId";

pub fn paper_mapping() -> EntityMapping<CommercialPaper> {
    EntityMapping::new("CommercialPaper", &["issuer", "number"], |p: &CommercialPaper| {
        Key::from([p.issuer.as_str(), p.number.as_str()])
    })
    .with_unique_key(EXTERNAL_ID, &["external_id"], |p: &CommercialPaper| {
        Key::from(p.external_id.as_str())
    })
}

pub fn entity_registry() -> Result<EntityRegistry, StateError> {
    Ok(EntityRegistry::builder().register(paper_mapping())?.build())
}

pub fn event_registry() -> EventRegistry {
    EventRegistry::builder()
        .register::<PaperIssued>()
        .register::<PaperBought>()
        .register_named::<PaperRedeemed>("paper.redeemed")
        .build()
}

fn paper_id(ctx: &Context<'_>) -> Result<Key, RouterError> {
    Ok(Key::from([
        ctx.arg::<String>("issuer")?.as_str(),
        ctx.arg::<String>("number")?.as_str(),
    ]))
}

fn issue(ctx: &mut Context<'_>) -> Result<CommercialPaper, RouterError> {
    let paper = CommercialPaper {
        issuer: ctx.arg::<String>("issuer")?.clone(),
        number: ctx.arg::<String>("number")?.clone(),
        owner: ctx.arg::<String>("issuer")?.clone(),
        face_value: *ctx.arg::<u64>("face_value")?,
        external_id: ctx.arg::<String>("external_id")?.clone(),
        state: PaperState::Issued,
        issued_at: Some(ctx.time()?),
    };

    let mut batch = CommandBatch::new();
    batch.insert(paper.clone());
    batch.set_event(PaperIssued {
        issuer: paper.issuer.clone(),
        number: paper.number.clone(),
        face_value: paper.face_value,
    });
    ctx.apply(batch)?;
    debug!(issuer = %paper.issuer, number = %paper.number, "paper issued");
    Ok(paper)
}

fn buy(ctx: &mut Context<'_>) -> Result<CommercialPaper, RouterError> {
    let mut paper: CommercialPaper = ctx.state().get(paper_id(ctx)?)?;
    let current = ctx.arg::<String>("current_owner")?;
    if &paper.owner != current {
        return Err(RouterError::handler(format!(
            "paper {}/{} is not owned by {current}",
            paper.issuer, paper.number
        )));
    }
    if paper.state == PaperState::Redeemed {
        return Err(RouterError::handler("paper is already redeemed"));
    }

    let event = PaperBought {
        issuer: paper.issuer.clone(),
        number: paper.number.clone(),
        from: paper.owner.clone(),
        to: ctx.arg::<String>("new_owner")?.clone(),
    };
    paper.owner = event.to.clone();
    paper.state = PaperState::Trading;

    ctx.state().put(&paper)?;
    ctx.event().set(&event)?;
    Ok(paper)
}

fn redeem(ctx: &mut Context<'_>) -> Result<CommercialPaper, RouterError> {
    let mut paper: CommercialPaper = ctx.state().get(paper_id(ctx)?)?;
    let by = ctx.arg::<String>("owner")?.clone();
    if paper.owner != by {
        return Err(RouterError::handler(format!("{by} does not own the paper")));
    }
    if paper.state == PaperState::Redeemed {
        return Err(RouterError::handler("paper is already redeemed"));
    }

    paper.owner = paper.issuer.clone();
    paper.state = PaperState::Redeemed;

    let mut batch = CommandBatch::new();
    batch.put(paper.clone());
    batch.set_event(PaperRedeemed {
        issuer: paper.issuer.clone(),
        number: paper.number.clone(),
        by,
    });
    ctx.apply(batch)?;
    Ok(paper)
}

/// Router serving the commercial paper contract.
pub fn router(config: RouterConfig) -> Result<Router, Box<dyn std::error::Error>> {
    let mut router = Router::with_config(config, entity_registry()?, event_registry())?;
    router.use_middleware([logging()]);
    router.init(|_: &mut Context<'_>| Ok("commercial-paper".to_string()), NONE);

    let mut paper = router.group("paper.");
    paper
        .invoke(
            "issue",
            issue,
            [
                param::<String>("issuer"),
                param::<String>("number"),
                param::<u64>("face_value"),
                param::<String>("external_id"),
            ],
        )
        .invoke(
            "buy",
            buy,
            [
                param::<String>("issuer"),
                param::<String>("number"),
                param::<String>("current_owner"),
                param::<String>("new_owner"),
            ],
        )
        .invoke(
            "redeem",
            redeem,
            [
                param::<String>("issuer"),
                param::<String>("number"),
                param::<String>("owner"),
            ],
        )
        .context_invoke(
            "delete",
            |ctx: &mut Context<'_>| Ok(ctx.state().delete::<CommercialPaper>(paper_id(ctx)?)?),
            [param::<String>("issuer"), param::<String>("number")],
        )
        .query(
            "get",
            |ctx: &mut Context<'_>| Ok(ctx.state().get::<CommercialPaper>(paper_id(ctx)?)?),
            [param::<String>("issuer"), param::<String>("number")],
        )
        .query(
            "byExternalId",
            |ctx: &mut Context<'_>| {
                let id = ctx.arg::<String>("external_id")?.clone();
                Ok(ctx
                    .state()
                    .get_by_unique_key::<CommercialPaper>(EXTERNAL_ID, id)?)
            },
            [param::<String>("external_id")],
        )
        .query(
            "list",
            |ctx: &mut Context<'_>| Ok(ctx.state().list::<CommercialPaper>()?),
            NONE,
        )
        .query(
            "listByIssuer",
            |ctx: &mut Context<'_>| {
                let issuer = ctx.arg::<String>("issuer")?.clone();
                Ok(ctx.state().list_with::<CommercialPaper>(issuer)?)
            },
            [param::<String>("issuer")],
        );
    Ok(router)
}
