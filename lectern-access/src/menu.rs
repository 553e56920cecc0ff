use lectern_tree::{Forest, MenuRecord, Record};

use crate::permission::PermissionSet;

/// Field carrying the permission code of a menu row.
pub const PERMS_FIELD: &str = "perms";

/// Permission code of an API menu row, if it declares one.
pub fn menu_perms(record: &MenuRecord) -> Option<&str> {
    record.str_field(PERMS_FIELD)
}

/// Prune a menu forest down to what `grants` may see.
///
/// Rows without a permission code stay visible. A denied row hides its
/// whole subtree.
pub fn visible_menus<R, F>(
    forest: Forest<R>,
    grants: &PermissionSet,
    perms_of: F,
) -> Forest<R>
where
    R: Record,
    F: Fn(&R) -> Option<&str>,
{
    let before = forest.len();
    let visible = forest.filter(|record| {
        perms_of(record).is_none_or(|code| grants.allows(code))
    });

    let hidden = before - visible.len();
    if hidden > 0 {
        log::debug!("permission filter hid {hidden} of {before} menu rows");
    }
    visible
}

#[cfg(test)]
mod tests {
    use lectern_tree::{RecordId, build_tree};

    use super::*;

    fn menu(
        id: RecordId,
        parent: Option<RecordId>,
        perms: Option<&str>,
    ) -> MenuRecord {
        let record = MenuRecord::new(id, parent, 0);
        match perms {
            Some(code) => record.with_field(PERMS_FIELD, code),
            None => record,
        }
    }

    fn forest() -> Forest<MenuRecord> {
        build_tree(vec![
            menu(1, None, None),
            menu(2, Some(1), Some("system:user:list")),
            menu(3, Some(2), Some("system:user:edit")),
            menu(4, Some(1), Some("system:role:list")),
            menu(5, Some(4), None),
            menu(6, None, Some("course:chapter:list")),
        ])
    }

    fn ids(forest: &Forest<MenuRecord>) -> Vec<RecordId> {
        forest.iter().map(|node| node.id()).collect()
    }

    #[test]
    fn visible_menus_keeps_allowed_rows_and_open_rows() {
        let grants = PermissionSet::new(["system:user"]);
        let visible = visible_menus(forest(), &grants, menu_perms);
        assert_eq!(ids(&visible), vec![1, 2, 3]);
    }

    #[test]
    fn visible_menus_hides_subtree_of_denied_row() {
        let grants = PermissionSet::new(["system:user:edit", "system:role"]);
        let visible = visible_menus(forest(), &grants, menu_perms);
        assert_eq!(ids(&visible), vec![1, 4, 5]);
    }

    #[test]
    fn visible_menus_with_admin_grant_keeps_everything() {
        let grants = PermissionSet::new(["*:*:*"]);
        let visible = visible_menus(forest(), &grants, menu_perms);
        assert_eq!(visible.len(), 6);
    }

    #[test]
    fn menu_perms_reads_string_field() {
        let record = menu(1, None, Some("system:menu:list"));
        assert_eq!(menu_perms(&record), Some("system:menu:list"));
        let numeric = MenuRecord::new(2, None, 0).with_field(PERMS_FIELD, 7);
        assert_eq!(menu_perms(&numeric), None);
    }
}
