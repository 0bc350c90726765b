use sqlx::{query, query_as, query_scalar, PgPool};

use crate::error::Error;
use crate::models::member::{FileMeta, Member, MemberFile, MemberStatus, NewMember};

// Sole owner of the members and member_files tables. Callers never touch
// the pool directly, and no authorization lives at this layer.
#[derive(Debug, Clone)]
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Inserts one row with status forced to pending and returns the
    // generated id. Column constraints back up the validation layer.
    pub async fn create(&self, member: &NewMember) -> Result<i32, Error> {
        let mut conn = self.pool.acquire().await?;
        let id = query_scalar(
            "INSERT INTO members (
                english_name, company_name, chapter, profession, phone, email,
                years_of_membership, is_gold_member, wedding_category, wedding_services,
                service_area, past_cases_count, unique_advantage,
                facebook_link, instagram_link, website_link,
                bni_member_discount, referrer, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, 'pending')
            RETURNING id",
        )
        .bind(&member.english_name)
        .bind(&member.company_name)
        .bind(&member.chapter)
        .bind(&member.profession)
        .bind(&member.phone)
        .bind(&member.email)
        .bind(member.years_of_membership)
        .bind(member.is_gold_member)
        .bind(&member.wedding_category)
        .bind(&member.wedding_services)
        .bind(&member.service_area)
        .bind(member.past_cases_count)
        .bind(&member.unique_advantage)
        .bind(&member.facebook_link)
        .bind(&member.instagram_link)
        .bind(&member.website_link)
        .bind(&member.bni_member_discount)
        .bind(&member.referrer)
        .fetch_one(&mut conn)
        .await?;
        Ok(id)
    }

    // One insert per uploaded file, in whatever order the caller chooses.
    pub async fn attach_file(&self, member_id: i32, file: &FileMeta) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;
        query(
            "INSERT INTO member_files (member_id, file_key, file_url, file_name, file_size, mime_type)
            VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(member_id)
        .bind(&file.file_key)
        .bind(&file.file_url)
        .bind(&file.file_name)
        .bind(file.file_size)
        .bind(&file.mime_type)
        .execute(&mut conn)
        .await?;
        Ok(())
    }

    pub async fn get(&self, id: i32) -> Result<Member, Error> {
        let mut conn = self.pool.acquire().await?;
        query_as("SELECT * FROM members WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut conn)
            .await?
            .ok_or_else(|| Error::NotFound(format!("member {}", id)))
    }

    pub async fn list(&self) -> Result<Vec<Member>, Error> {
        let mut conn = self.pool.acquire().await?;
        let members = query_as("SELECT * FROM members ORDER BY created_at DESC, id DESC")
            .fetch_all(&mut conn)
            .await?;
        Ok(members)
    }

    pub async fn files(&self, member_id: i32) -> Result<Vec<MemberFile>, Error> {
        let mut conn = self.pool.acquire().await?;
        let files = query_as("SELECT * FROM member_files WHERE member_id = $1 ORDER BY id")
            .bind(member_id)
            .fetch_all(&mut conn)
            .await?;
        Ok(files)
    }

    // Overwrites status and refreshes updated_at; idempotent for a repeated
    // status. NotFound when no such member exists.
    pub async fn update_status(&self, id: i32, status: MemberStatus) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;
        let result = query("UPDATE members SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(&mut conn)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("member {}", id)));
        }
        Ok(())
    }
}
