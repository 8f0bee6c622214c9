//! Record store abstraction consumed by the upgrade runner.

use stowage_common::{Attachable, RecordId, RecordKind, Result};

use crate::models::AnyRecord;
use crate::pool::{get_conn, DbPool};
use crate::queries::{accounts, custom_emojis, media_attachments, preview_cards};

/// Paginated access to attachable records and per-record persistence.
pub trait RecordStore {
    /// Load up to `limit` records of `kind` with an id greater than `after`,
    /// ordered by id.
    fn find_batch(
        &self,
        kind: RecordKind,
        after: Option<RecordId>,
        limit: usize,
    ) -> Result<Vec<AnyRecord>>;

    /// Persist the attachment state of one record and mark it unchanged.
    fn save(&self, record: &mut AnyRecord) -> Result<()>;
}

/// SQLite-backed record store.
#[derive(Clone)]
pub struct SqliteRecordStore {
    pool: DbPool,
}

impl SqliteRecordStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl RecordStore for SqliteRecordStore {
    fn find_batch(
        &self,
        kind: RecordKind,
        after: Option<RecordId>,
        limit: usize,
    ) -> Result<Vec<AnyRecord>> {
        let conn = get_conn(&self.pool)?;

        let records = match kind {
            RecordKind::Account => accounts::list_accounts_after(&conn, after, limit)?
                .into_iter()
                .map(AnyRecord::from)
                .collect(),
            RecordKind::CustomEmoji => custom_emojis::list_custom_emojis_after(&conn, after, limit)?
                .into_iter()
                .map(AnyRecord::from)
                .collect(),
            RecordKind::MediaAttachment => {
                media_attachments::list_media_attachments_after(&conn, after, limit)?
                    .into_iter()
                    .map(AnyRecord::from)
                    .collect()
            }
            RecordKind::PreviewCard => preview_cards::list_preview_cards_after(&conn, after, limit)?
                .into_iter()
                .map(AnyRecord::from)
                .collect(),
        };

        Ok(records)
    }

    fn save(&self, record: &mut AnyRecord) -> Result<()> {
        let conn = get_conn(&self.pool)?;

        match record {
            AnyRecord::Account(r) => accounts::update_account_attachments(&conn, r)?,
            AnyRecord::CustomEmoji(r) => custom_emojis::update_custom_emoji_attachments(&conn, r)?,
            AnyRecord::MediaAttachment(r) => {
                media_attachments::update_media_attachment_attachments(&conn, r)?
            }
            AnyRecord::PreviewCard(r) => preview_cards::update_preview_card_attachments(&conn, r)?,
        }

        record.mark_persisted();
        tracing::trace!(kind = %record.kind(), id = %record.id(), "Saved record");
        Ok(())
    }
}
