use serde::Deserialize;

use crate::error::Error;
use crate::models::member::{GoldMember, Member, MemberStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    All,
    Pending,
    Approved,
    Rejected,
}

impl StatusFilter {
    pub fn all() -> Self {
        StatusFilter::All
    }

    fn matches(self, status: MemberStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == MemberStatus::Pending,
            StatusFilter::Approved => status == MemberStatus::Approved,
            StatusFilter::Rejected => status == MemberStatus::Rejected,
        }
    }
}

// Case-insensitive substring match against name, email and profession,
// conjoined with an exact status match. Pure and recomputed per call.
pub fn filter_members<'m>(members: &'m [Member], term: &str, filter: StatusFilter) -> Vec<&'m Member> {
    let term = term.to_lowercase();
    members
        .iter()
        .filter(|m| {
            let matches_search = m.english_name.to_lowercase().contains(&term)
                || m.email.to_lowercase().contains(&term)
                || m.profession.to_lowercase().contains(&term);
            matches_search && filter.matches(m.status)
        })
        .collect()
}

const CSV_HEADERS: &[&str] = &[
    "ID",
    "英文名稱",
    "公司名稱",
    "所屬分會",
    "專業領域",
    "電話",
    "電郵",
    "入會年資",
    "金章會員",
    "婚宴分類",
    "服務區域",
    "案例數量",
    "狀態",
    "提交時間",
];

// Serializes the filtered view: UTF-8 with byte-order mark, one localized
// header row, every cell quoted. Not a repository operation.
pub fn export_csv(members: &[&Member]) -> Result<Vec<u8>, Error> {
    let mut buf: Vec<u8> = vec![0xEF, 0xBB, 0xBF];
    {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .from_writer(&mut buf);
        writer.write_record(CSV_HEADERS)?;
        for m in members {
            writer.write_record(&[
                m.id.to_string(),
                m.english_name.clone(),
                m.company_name.clone().unwrap_or_default(),
                m.chapter.clone(),
                m.profession.clone(),
                m.phone.clone(),
                m.email.clone(),
                m.years_of_membership.to_string(),
                match m.is_gold_member {
                    GoldMember::Yes => "是".to_owned(),
                    GoldMember::No => "否".to_owned(),
                },
                m.wedding_category.clone(),
                m.service_area.clone().unwrap_or_default(),
                m.past_cases_count.map(|c| c.to_string()).unwrap_or_default(),
                match m.status {
                    MemberStatus::Pending => "待審核".to_owned(),
                    MemberStatus::Approved => "已批准".to_owned(),
                    MemberStatus::Rejected => "已拒絕".to_owned(),
                },
                m.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            ])?;
        }
        writer.flush().map_err(csv::Error::from)?;
    }
    Ok(buf)
}
