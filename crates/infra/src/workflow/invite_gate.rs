//! Single-use invite consumption.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use supplier_core::Clock;
use supplier_invites::InviteRejection;

use crate::store::InviteRegistry;

/// Gate in front of user creation.
///
/// The pre-check gives the caller a precise reason; the registry's
/// conditional update is what guarantees at most one caller ever gets
/// through for a given code.
pub struct InviteGate<R: ?Sized> {
    registry: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> InviteGate<R>
where
    R: InviteRegistry + ?Sized,
{
    pub fn new(registry: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    #[instrument(skip(self, code))]
    pub async fn consume(&self, code: &str) -> Result<(), InviteRejection> {
        let code = code.trim();
        if code.is_empty() {
            return Err(InviteRejection::Missing);
        }
        let now = self.clock.now();

        let invite = match self.registry.get_by_code(code).await {
            Ok(Some(invite)) => invite,
            Ok(None) => return Err(reject(InviteRejection::NotFound)),
            Err(err) => {
                warn!(error = %err, "invite lookup failed");
                return Err(InviteRejection::Unavailable);
            }
        };
        invite.check_consumable(now).map_err(reject)?;

        match self.registry.consume_if_unused(code, now).await {
            Ok(true) => {
                info!("invite code consumed");
                Ok(())
            }
            Ok(false) => Err(reject(InviteRejection::AlreadyUsed)),
            Err(err) => {
                warn!(error = %err, "invite consumption could not be persisted");
                Err(InviteRejection::AlreadyUsed)
            }
        }
    }
}

fn reject(reason: InviteRejection) -> InviteRejection {
    info!(%reason, "invite code rejected");
    reason
}
