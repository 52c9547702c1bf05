//! Administrator account listing, registration checks and export.
//!
//! Persistence is not handled here: callers pass the accounts they loaded and
//! get back pages, validation errors or a rendered export.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assemble::{DocumentRenderer, PdfExport};
use crate::config::ReportConfig;
use crate::context::AsOf;
use crate::error::Result;
use crate::records::{AccountRecord, RosterInput};
use crate::reports::{export, ReportRequest};

/// Search and paging parameters of the administrator listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdminQuery {
    pub search: String,
    pub page: usize,
    pub page_size: usize,
}

impl Default for AdminQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 1,
            page_size: 10,
        }
    }
}

/// One page of matching administrator accounts.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPage {
    pub admins: Vec<AccountRecord>,
    pub current_page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ListingError {
    #[error("No se encontraron administradores con ese criterio de búsqueda")]
    NoMatches,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Este correo ya pertenece a una cuenta registrada")]
    AdminEmailTaken,

    #[error("El correo esta asociado a una cuenta de docente, los correos para administradores deben ser los de coordinacion. Ej: sistemas@dominio, gestion@dominio")]
    TeacherEmailTaken,
}

/// `None` only when even the escaped search exceeds the regex size limit.
fn search_pattern(search: &str) -> Option<Regex> {
    RegexBuilder::new(search)
        .case_insensitive(true)
        .build()
        .or_else(|_| {
            RegexBuilder::new(&regex::escape(search))
                .case_insensitive(true)
                .build()
        })
        .ok()
}

/// Filters `records` by name or email and returns the requested page.
///
/// `search` is a case-insensitive regular expression; a pattern that does not
/// compile is matched literally. Page numbers start at 1.
pub fn list_admins(
    records: &[AccountRecord],
    query: &AdminQuery,
) -> std::result::Result<AdminPage, ListingError> {
    let pattern = search_pattern(&query.search).ok_or(ListingError::NoMatches)?;
    let matching: Vec<&AccountRecord> = records
        .iter()
        .filter(|record| pattern.is_match(&record.nombre) || pattern.is_match(&record.correo))
        .collect();

    let page = query.page.max(1);
    let page_size = query.page_size.max(1);
    let admins: Vec<AccountRecord> = matching
        .iter()
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .map(|record| (*record).clone())
        .collect();
    if admins.is_empty() {
        return Err(ListingError::NoMatches);
    }

    let total_items = matching.len();
    Ok(AdminPage {
        admins,
        current_page: page,
        page_size,
        total_items,
        total_pages: (total_items + page_size - 1) / page_size,
    })
}

/// Rejects an email already used by an administrator or a teacher.
pub fn check_email_available<'a, A, T>(
    correo: &str,
    admin_emails: A,
    teacher_emails: T,
) -> std::result::Result<(), RegistrationError>
where
    A: IntoIterator<Item = &'a str>,
    T: IntoIterator<Item = &'a str>,
{
    if admin_emails.into_iter().any(|email| email == correo) {
        return Err(RegistrationError::AdminEmailTaken);
    }
    if teacher_emails.into_iter().any(|email| email == correo) {
        return Err(RegistrationError::TeacherEmailTaken);
    }
    Ok(())
}

/// Renders every administrator account into the `administradores.pdf` export.
pub fn export_admins<R>(
    renderer: &R,
    records: &[AccountRecord],
    config: &ReportConfig,
    as_of: AsOf,
) -> Result<PdfExport>
where
    R: DocumentRenderer + ?Sized,
{
    let request = ReportRequest::Administrators(RosterInput {
        records: records.to_vec(),
        carrera: None,
    });
    export(renderer, &request, config, as_of)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(nombre: &str, correo: &str) -> AccountRecord {
        AccountRecord {
            nombre: nombre.into(),
            correo: correo.into(),
            ..AccountRecord::default()
        }
    }

    fn accounts() -> Vec<AccountRecord> {
        vec![
            account("Ana López", "sistemas@itc.mx"),
            account("Bruno Díaz", "gestion@itc.mx"),
            account("Carla Ruiz", "industrial@itc.mx"),
        ]
    }

    #[test]
    fn search_is_case_insensitive_over_name_and_email() {
        let query = AdminQuery {
            search: "GESTION".into(),
            ..AdminQuery::default()
        };
        let page = list_admins(&accounts(), &query).expect("one match");
        assert_eq!(page.total_items, 1);
        assert_eq!(page.admins[0].nombre, "Bruno Díaz");
    }

    #[test]
    fn invalid_pattern_is_matched_literally() {
        let mut records = accounts();
        records.push(account("Soporte (temporal", "soporte@itc.mx"));
        let query = AdminQuery {
            search: "(temporal".into(),
            ..AdminQuery::default()
        };
        let page = list_admins(&records, &query).expect("literal match");
        assert_eq!(page.admins[0].correo, "soporte@itc.mx");
    }

    #[test]
    fn pages_split_matches() {
        let query = AdminQuery {
            search: String::new(),
            page: 2,
            page_size: 2,
        };
        let page = list_admins(&accounts(), &query).expect("second page");
        assert_eq!(page.admins.len(), 1);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.current_page, 2);

        let beyond = AdminQuery { page: 3, ..query };
        assert_eq!(list_admins(&accounts(), &beyond), Err(ListingError::NoMatches));
    }

    #[test]
    fn unmatched_search_reports_the_listing_message() {
        let query = AdminQuery {
            search: "posgrado".into(),
            ..AdminQuery::default()
        };
        let err = list_admins(&accounts(), &query).expect_err("no account matches");
        assert_eq!(err, ListingError::NoMatches);
        assert_eq!(
            err.to_string(),
            "No se encontraron administradores con ese criterio de búsqueda"
        );
    }

    #[test]
    fn taken_emails_are_rejected_with_their_message() {
        let admins = ["sistemas@itc.mx"];
        let teachers = ["maria.perez@itc.mx"];
        assert_eq!(
            check_email_available("sistemas@itc.mx", admins, teachers),
            Err(RegistrationError::AdminEmailTaken)
        );
        let err = check_email_available("maria.perez@itc.mx", admins, teachers)
            .expect_err("teacher email");
        assert!(err.to_string().starts_with("El correo esta asociado a una cuenta de docente"));
        assert!(check_email_available("gestion@itc.mx", admins, teachers).is_ok());
    }
}
