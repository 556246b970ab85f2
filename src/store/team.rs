use chrono::Utc;
use rusqlite::{Row, params};
use uuid::Uuid;

use crate::error::Result;
use crate::model::{MAX_MEMBER_NAME_LEN, TeamMember, validate_name};
use crate::store::db::{Db, id_from_column, timestamp_from_column};

impl Db {
    pub fn create_member(&self, name: &str) -> Result<TeamMember> {
        let member = TeamMember {
            id: Uuid::new_v4(),
            name: validate_name("team member", name, MAX_MEMBER_NAME_LEN)?,
            created_at: Utc::now(),
        };
        self.conn().execute(
            "INSERT INTO team_members (id, name, created_at) VALUES (?1, ?2, ?3)",
            params![
                member.id.to_string(),
                member.name,
                member.created_at.to_rfc3339(),
            ],
        )?;
        Ok(member)
    }

    pub fn find_member(&self, id: Uuid) -> Result<Option<TeamMember>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT id, name, created_at FROM team_members WHERE id = ?1")?;
        let result = stmt.query_row(params![id.to_string()], row_to_member);
        match result {
            Ok(member) => Ok(Some(member)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list_members(&self) -> Result<Vec<TeamMember>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT id, name, created_at FROM team_members ORDER BY name, id")?;
        let members = stmt
            .query_map([], row_to_member)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(members)
    }
}

fn row_to_member(row: &Row<'_>) -> rusqlite::Result<TeamMember> {
    Ok(TeamMember {
        id: id_from_column(0, row.get(0)?)?,
        name: row.get(1)?,
        created_at: timestamp_from_column(2, row.get(2)?)?,
    })
}
