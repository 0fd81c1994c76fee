//! Shared member display formatting

use tabled::{settings::Style, Table, Tabled};

use crate::models::SharedUser;

#[derive(Tabled)]
struct MemberRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
}

pub fn format_member_list(members: &[SharedUser]) -> String {
    if members.is_empty() {
        return "No shared members.".to_string();
    }

    let mut table = Table::new(members.iter().map(|m| MemberRow {
        name: m.name.clone(),
        email: m.email.clone(),
    }));
    table.with(Style::psql());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;

    #[test]
    fn test_member_table() {
        let owner = UserId::new();
        let text = format_member_list(&[SharedUser::new(owner, "Ana", "ana@example.com")]);
        assert!(text.contains("Ana"));
        assert!(text.contains("ana@example.com"));
        assert_eq!(format_member_list(&[]), "No shared members.");
    }
}
