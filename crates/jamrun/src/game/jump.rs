/// Identifies one jump so that a late cooldown expiry cannot end a newer jump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JumpTicket(u64);

/// Jump flag owned by the input handler
#[derive(Debug, Clone, Default)]
pub struct JumpState {
    active: bool,
    generation: u64,
}

impl JumpState {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Begin a jump unless one is already in flight
    pub(crate) fn try_start(&mut self) -> Option<JumpTicket> {
        if self.active {
            return None;
        }
        self.active = true;
        self.generation += 1;
        Some(JumpTicket(self.generation))
    }

    /// End the jump identified by `ticket`. Stale tickets are ignored.
    pub(crate) fn land(&mut self, ticket: JumpTicket) -> bool {
        if self.active && ticket.0 == self.generation {
            self.active = false;
            return true;
        }
        false
    }

    /// Drop any jump in flight; its pending expiry becomes stale
    pub(crate) fn clear(&mut self) {
        self.active = false;
        self.generation += 1;
    }
}
