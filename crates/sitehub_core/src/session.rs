use crate::error::AppError;
use crate::model::Member;
use crate::roster::Roster;

/// Holds the identity authenticated for the current interactive run.
/// Logging out only drops the member; stored days are untouched.
#[derive(Debug, Default)]
pub struct Session {
    current: Option<Member>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(
        &mut self,
        roster: &Roster,
        identifier: &str,
        pin: &str,
    ) -> Result<&Member, AppError> {
        let member = roster.authenticate(identifier, pin)?;
        Ok(self.current.insert(member))
    }

    pub fn logout(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Member> {
        self.current.as_ref()
    }
}
