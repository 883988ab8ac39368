//! Session-scoped catalog operations.
//!
//! Every operation loads the session document, applies one [`Catalog`]
//! operation and, for mutations, saves the whole document back under the
//! session lock.

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::engine::{
    self, EngineSettings, InferenceRequest, InferenceResponse, MembershipCurve,
};
use crate::error::{FisError, FisResult};
use crate::models::{
    Antecedent, Catalog, ClearedOutput, Domain, Rule, Term, TermRecord, TermSpec, VariableKind,
};
use crate::services::exchange::{self, ExportBundle, ExportScope};
use crate::services::report::SystemReport;
use crate::services::store::DocumentStore;

/// A term together with the variable that owns it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermView {
    /// Owning variable.
    pub variable_name: String,
    /// Kind of the owning variable.
    pub kind: VariableKind,
    /// Domain of the owning variable.
    pub domain: Domain,
    /// The term as persisted.
    #[serde(flatten)]
    pub term: TermRecord,
}

/// Catalog operations bound to a document store.
#[derive(Debug)]
pub struct CatalogService {
    store: DocumentStore,
    settings: EngineSettings,
}

impl CatalogService {
    /// Creates a service over `store` with the given engine settings.
    pub fn new(store: DocumentStore, settings: EngineSettings) -> Self {
        Self { store, settings }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Engine settings used by inference and curve sampling.
    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// The whole catalog of a session.
    pub fn catalog(&self, session: &str) -> FisResult<Catalog> {
        self.store.load(session)
    }

    /// The session document in its persisted layout.
    pub fn document(&self, session: &str) -> FisResult<Value> {
        Ok(self.store.load(session)?.to_document())
    }

    /// Replaces the session document wholesale.
    pub fn replace_document(&self, session: &str, document: Value) -> FisResult<Catalog> {
        let catalog = Catalog::from_document(document)?;
        self.store.save(session, &catalog)?;
        Ok(catalog)
    }

    /// Creates a term, and its variable on first use.
    pub fn create_term(
        &self,
        session: &str,
        kind: VariableKind,
        spec: &TermSpec,
    ) -> FisResult<Term> {
        let term = self
            .store
            .update(session, |catalog| catalog.create_term(kind, spec))?;
        info!(
            "Created {} term {}.{} in session {}",
            kind, spec.variable_name, term.name, session
        );
        Ok(term)
    }

    /// Replaces a term, optionally renaming it.
    pub fn modify_term(
        &self,
        session: &str,
        old_term_name: &str,
        spec: &TermSpec,
    ) -> FisResult<Term> {
        let term = self
            .store
            .update(session, |catalog| catalog.modify_term(old_term_name, spec))?;
        info!(
            "Modified term {}.{} in session {}",
            spec.variable_name, old_term_name, session
        );
        Ok(term)
    }

    /// Looks up a term by variable and term name.
    pub fn get_term(
        &self,
        session: &str,
        variable_name: &str,
        term_name: &str,
    ) -> FisResult<TermView> {
        let catalog = self.store.load(session)?;
        let (variable, term) = catalog.get_term(variable_name, term_name)?;
        Ok(TermView {
            variable_name: variable.name.clone(),
            kind: variable.kind,
            domain: variable.domain,
            term: TermRecord::from(term),
        })
    }

    /// Deletes the first term with this name. Returns the owning variable
    /// name and the removed term.
    pub fn delete_term(&self, session: &str, term_name: &str) -> FisResult<(String, Term)> {
        let deleted = self
            .store
            .update(session, |catalog| catalog.delete_term(term_name))?;
        info!(
            "Deleted term {}.{} in session {}",
            deleted.0, term_name, session
        );
        Ok(deleted)
    }

    /// Appends a rule and returns its id.
    pub fn create_rule(
        &self,
        session: &str,
        inputs: Vec<Antecedent>,
        output_variable: &str,
        output_term: &str,
    ) -> FisResult<usize> {
        let rule_id = self.store.update(session, |catalog| {
            catalog.create_rule(inputs, output_variable, output_term)
        })?;
        info!("Created rule {} in session {}", rule_id, session);
        Ok(rule_id)
    }

    /// Deletes a rule by id.
    pub fn delete_rule(&self, session: &str, rule_id: usize) -> FisResult<Rule> {
        let rule = self
            .store
            .update(session, |catalog| catalog.delete_rule(rule_id))?;
        info!("Deleted rule {} in session {}", rule_id, session);
        Ok(rule)
    }

    /// Removes the output variable and its rules.
    pub fn clear_output(&self, session: &str) -> FisResult<ClearedOutput> {
        let cleared = self
            .store
            .update(session, |catalog| Ok(catalog.clear_output()))?;
        info!(
            "Cleared output {:?} ({} rules) in session {}",
            cleared.variables, cleared.rules_removed, session
        );
        Ok(cleared)
    }

    /// Samples the terms of one variable for plotting.
    pub fn membership_curves(
        &self,
        session: &str,
        kind: VariableKind,
        variable_name: &str,
    ) -> FisResult<Vec<MembershipCurve>> {
        let catalog = self.store.load(session)?;
        let variable = catalog.variable(kind, variable_name).ok_or_else(|| {
            FisError::not_found(format!("{kind} variable '{variable_name}' not found"))
        })?;
        Ok(engine::membership_curves(variable, &self.settings))
    }

    /// Runs inference against the session's catalog.
    pub fn infer(
        &self,
        session: &str,
        request: &InferenceRequest,
    ) -> FisResult<InferenceResponse> {
        let catalog = self.store.load(session)?;
        engine::infer(&catalog, request, &self.settings)
    }

    /// Summarises the session's system.
    pub fn report(&self, session: &str) -> FisResult<SystemReport> {
        Ok(SystemReport::from_catalog(&self.store.load(session)?))
    }

    /// Exports the session document, dated today.
    pub fn export(&self, session: &str, scope: ExportScope) -> FisResult<ExportBundle> {
        let catalog = self.store.load(session)?;
        let today = chrono::Local::now().date_naive();
        Ok(exchange::export(&catalog, scope, today))
    }

    /// Replaces the session document with an imported one.
    pub fn import(&self, session: &str, document: Value) -> FisResult<Catalog> {
        let catalog = exchange::parse_import(document)?;
        self.store.save(session, &catalog)?;
        info!(
            "Imported {} variables and {} rules into session {}",
            catalog.variables.len(),
            catalog.rules.len(),
            session
        );
        Ok(catalog)
    }
}
