//! `expect`/`actual` matching, shared by every declaration kind.

use super::{Declaration, DeclarationBase};
use crate::session::Session;
use ksp_ir::Modifiers;

/// Multiplatform counterpart lookups for one declaration.
///
/// Counterparts are never memoized: an `expect` and its `actual` would
/// otherwise keep each other alive.
pub(crate) struct ExpectActual<'a> {
    base: &'a DeclarationBase,
}

impl<'a> ExpectActual<'a> {
    pub(crate) fn new(base: &'a DeclarationBase) -> Self {
        ExpectActual { base }
    }

    pub(crate) fn is_expect(&self, session: &Session) -> bool {
        self.base
            .declared_modifiers(session)
            .contains(Modifiers::EXPECT)
    }

    pub(crate) fn is_actual(&self, session: &Session) -> bool {
        self.base
            .declared_modifiers(session)
            .contains(Modifiers::ACTUAL)
    }

    /// `expect` declarations this `actual` implements.
    pub(crate) fn find_expects(&self, session: &Session) -> Vec<Declaration> {
        if !self.is_actual(session) {
            return Vec::new();
        }
        self.counterparts(session, |candidate| candidate.is_expect(session))
    }

    /// `actual` declarations implementing this `expect`.
    pub(crate) fn find_actuals(&self, session: &Session) -> Vec<Declaration> {
        if !self.is_expect(session) {
            return Vec::new();
        }
        self.counterparts(session, |candidate| candidate.is_actual(session))
    }

    fn counterparts(
        &self,
        session: &Session,
        keep: impl Fn(&Declaration) -> bool,
    ) -> Vec<Declaration> {
        let Some(descriptor) = self.base.descriptor(session) else {
            return Vec::new();
        };
        session
            .resolver()
            .expect_actual_counterparts(&descriptor)
            .into_iter()
            .filter_map(|id| session.descriptor(id))
            .filter_map(|counterpart| Declaration::from_descriptor(session, &counterpart))
            .filter(|candidate| keep(candidate))
            .collect()
    }
}
