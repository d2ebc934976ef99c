//! Import service - contacts from delimited files.
//!
//! An uploaded file is first previewed: every line is parsed and flagged
//! against existing records without writing anything. Confirming the same
//! file runs the same interpretation inside one transaction and creates the
//! missing records. Any failing line rolls the whole batch back.

mod columns;
mod reader;
mod resolver;
mod row;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::infra::{RepositorySet, UnitOfWork};
use common::{AppResult, CrmSettings, OptionExt};
use domain::{ContactsImport, ImportEncoding};

pub use columns::ImportColumns;
pub use reader::{decode, read_file, ImportFile};
pub use resolver::{NameFlag, PreviewRow, RowResolver};
pub use row::{parse_birth_date, parse_gender, split_roles, AddressCells, EntityCells, ImportRow, RowOptions};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const UNSUBSCRIBE_SEPARATOR: u8 = b';';

/// Dry-run result of an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ImportPreview {
    /// Lines read, header included
    pub total_rows: usize,
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<Object>))]
    pub rows: Vec<PreviewRow>,
}

/// Import service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ImportService: Send + Sync {
    /// Header line of a blank import file
    async fn template(&self) -> AppResult<String>;

    async fn preview(&self, import_id: Uuid, bytes: Vec<u8>) -> AppResult<ImportPreview>;

    /// Create the records of every line. Returns the number of contacts written.
    ///
    /// `default_department` locates new cities whose zip code is too short.
    async fn confirm(&self, import_id: Uuid, bytes: Vec<u8>, default_department: String) -> AppResult<usize>;

    /// Opt every contact listed by email out of all its subscriptions.
    /// Returns how many contacts had a subscription.
    async fn unsubscribe(&self, bytes: Vec<u8>) -> AppResult<usize>;
}

/// Concrete implementation of ImportService using Unit of Work.
pub struct ImportManager<U: UnitOfWork> {
    uow: Arc<U>,
    settings: Arc<CrmSettings>,
}

/// Everything a batch needs before its first line.
struct Prepared {
    import: ContactsImport,
    columns: ImportColumns,
    file: ImportFile,
}

impl<U: UnitOfWork> ImportManager<U> {
    pub fn new(uow: Arc<U>, settings: Arc<CrmSettings>) -> Self {
        Self { uow, settings }
    }

    async fn columns(&self) -> AppResult<ImportColumns> {
        let subscription_types = self.uow.subscriptions().list_types().await?;
        let custom_fields = self.uow.custom_fields().list_by_import_order().await?;
        ImportColumns::new(&subscription_types, custom_fields)
    }

    /// Load the import and decode the file, failing before any line is handled.
    async fn prepare(&self, import_id: Uuid, bytes: &[u8]) -> AppResult<Prepared> {
        let import = self
            .uow
            .imports()
            .get_import(import_id)
            .await?
            .ok_or_not_found("Import")?;
        let separator = import.separator_byte()?;
        let file = read_file(bytes, import.encoding, separator)?;
        let columns = self.columns().await?;
        Ok(Prepared {
            import,
            columns,
            file,
        })
    }

    fn row_options(&self, import: &ContactsImport) -> RowOptions {
        RowOptions {
            allow_couple_gender: self.settings.allow_couple_gender,
            entity_name_from_email: import.entity_name_from_email,
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> ImportService for ImportManager<U> {
    async fn template(&self) -> AppResult<String> {
        Ok(self.columns().await?.template())
    }

    async fn preview(&self, import_id: Uuid, bytes: Vec<u8>) -> AppResult<ImportPreview> {
        let Prepared {
            import,
            columns,
            file,
        } = self.prepare(import_id, &bytes).await?;
        let options = self.row_options(&import);

        let zones = self.uow.zones();
        let entities = self.uow.entities();
        let contacts = self.uow.contacts();
        let groups = self.uow.groups();
        let actions = self.uow.actions();
        let custom_fields = self.uow.custom_fields();
        let subscriptions = self.uow.subscriptions();
        let imports = self.uow.imports();
        let repos = RepositorySet {
            zones: zones.as_ref(),
            entities: entities.as_ref(),
            contacts: contacts.as_ref(),
            groups: groups.as_ref(),
            actions: actions.as_ref(),
            custom_fields: custom_fields.as_ref(),
            subscriptions: subscriptions.as_ref(),
            imports: imports.as_ref(),
        };

        let mut resolver = RowResolver::new(repos, &self.settings, &import, &columns, "");
        let mut rows = Vec::new();
        for cells in file.data_rows() {
            let row = ImportRow::parse(cells, &columns, options);
            rows.push(resolver.inspect(row).await?);
        }

        tracing::info!(
            import = %import_id,
            rows = rows.len(),
            "Import previewed"
        );
        Ok(ImportPreview {
            total_rows: file.total_rows(),
            rows,
        })
    }

    async fn confirm(&self, import_id: Uuid, bytes: Vec<u8>, default_department: String) -> AppResult<usize> {
        let Prepared {
            import,
            columns,
            file,
        } = self.prepare(import_id, &bytes).await?;
        let options = self.row_options(&import);
        let rows: Vec<ImportRow> = file
            .data_rows()
            .map(|cells| ImportRow::parse(cells, &columns, options))
            .collect();
        let settings = self.settings.clone();

        let count = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let mut resolver =
                        RowResolver::new(ctx.repos(), &settings, &import, &columns, &default_department);
                    for row in &rows {
                        resolver.apply(row).await?;
                    }
                    Ok(rows.len())
                })
            })
            .await?;

        tracing::info!(import = %import_id, contacts = count, "Import confirmed");
        Ok(count)
    }

    async fn unsubscribe(&self, bytes: Vec<u8>) -> AppResult<usize> {
        let file = read_file(&bytes, ImportEncoding::Utf8, UNSUBSCRIBE_SEPARATOR)?;
        let emails: Vec<String> = file
            .records
            .iter()
            .filter_map(|record| record.first())
            .map(|cell| cell.trim().to_string())
            .filter(|email| !email.is_empty())
            .collect();

        let count = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let now = Utc::now();
                    let mut count = 0;
                    for email in &emails {
                        for contact in ctx.contacts().find_contacts_by_email(email).await? {
                            let subscriptions = ctx.subscriptions().find_for_contact(contact.id).await?;
                            if subscriptions.is_empty() {
                                continue;
                            }
                            count += 1;
                            for mut subscription in subscriptions {
                                subscription.unsubscribe(now);
                                ctx.subscriptions().save(&subscription).await?;
                            }
                        }
                    }
                    Ok(count)
                })
            })
            .await?;

        tracing::info!(contacts = count, "Unsubscribe file processed");
        Ok(count)
    }
}
