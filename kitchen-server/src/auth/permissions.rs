//! Permission Definitions
//!
//! Role based access. Reading inventory, recipes, orders and suppliers only
//! needs a login; writes are gated per module. Staff and payroll are
//! admin-only and go through `require_admin` instead of a permission.

use shared::models::UserRole;

pub const INVENTORY_MANAGE: &str = "inventory:manage";
pub const STOCK_MOVE: &str = "stock:move";
pub const RECIPES_MANAGE: &str = "recipes:manage";
pub const ORDERS_CREATE: &str = "orders:create";
pub const ORDERS_STATUS: &str = "orders:status";
pub const ORDERS_MANAGE: &str = "orders:manage";
pub const SUPPLIERS_MANAGE: &str = "suppliers:manage";
pub const PURCHASE_ORDERS_MANAGE: &str = "purchase_orders:manage";
pub const REPORTS_VIEW: &str = "reports:view";

pub const ALL_PERMISSIONS: &[&str] = &[
    INVENTORY_MANAGE,
    STOCK_MOVE,
    RECIPES_MANAGE,
    ORDERS_CREATE,
    ORDERS_STATUS,
    ORDERS_MANAGE,
    SUPPLIERS_MANAGE,
    PURCHASE_ORDERS_MANAGE,
    REPORTS_VIEW,
];

pub const DEFAULT_ADMIN_PERMISSIONS: &[&str] = &["all"];

pub const DEFAULT_INVENTORY_MANAGER_PERMISSIONS: &[&str] = &[
    INVENTORY_MANAGE,
    STOCK_MOVE,
    SUPPLIERS_MANAGE,
    PURCHASE_ORDERS_MANAGE,
    REPORTS_VIEW,
];

pub const DEFAULT_KITCHEN_STAFF_PERMISSIONS: &[&str] =
    &[STOCK_MOVE, RECIPES_MANAGE, ORDERS_CREATE, ORDERS_STATUS];

pub const DEFAULT_DELIVERY_STAFF_PERMISSIONS: &[&str] = &[ORDERS_STATUS];

/// Permissions granted to a role
pub fn get_default_permissions(role: UserRole) -> Vec<String> {
    let perms = match role {
        UserRole::Admin => DEFAULT_ADMIN_PERMISSIONS,
        UserRole::InventoryManager => DEFAULT_INVENTORY_MANAGER_PERMISSIONS,
        UserRole::KitchenStaff => DEFAULT_KITCHEN_STAFF_PERMISSIONS,
        UserRole::DeliveryStaff => DEFAULT_DELIVERY_STAFF_PERMISSIONS,
    };
    perms.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_defaults() {
        assert_eq!(get_default_permissions(UserRole::Admin), vec!["all"]);

        let kitchen = get_default_permissions(UserRole::KitchenStaff);
        assert!(kitchen.contains(&STOCK_MOVE.to_string()));
        assert!(!kitchen.contains(&INVENTORY_MANAGE.to_string()));

        let delivery = get_default_permissions(UserRole::DeliveryStaff);
        assert_eq!(delivery, vec![ORDERS_STATUS.to_string()]);
    }

    #[test]
    fn test_defaults_are_known_permissions() {
        for role in [
            UserRole::InventoryManager,
            UserRole::KitchenStaff,
            UserRole::DeliveryStaff,
        ] {
            for p in get_default_permissions(role) {
                assert!(ALL_PERMISSIONS.contains(&p.as_str()), "{p}");
            }
        }
    }
}
