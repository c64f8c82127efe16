//! 权限定义

use serde::{Deserialize, Serialize};

/// 权限代码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    ViewProducts,
    CreateProducts,
    EditProducts,
    DeleteProducts,
    ApproveProducts,
    ManageCategories,
    ManageInventory,
    ViewOrders,
    ManageOrders,
    FulfillOrders,
    PlaceOrders,
    ViewUsers,
    ManageUsers,
    ManageRoles,
    ModerateReviews,
    WriteReviews,
    ManageVendors,
    ViewReports,
    ViewTaxReports,
    ManageSettings,
    ManageOwnProfile,
}

impl Permission {
    pub const ALL: [Permission; 21] = [
        Permission::ViewProducts,
        Permission::CreateProducts,
        Permission::EditProducts,
        Permission::DeleteProducts,
        Permission::ApproveProducts,
        Permission::ManageCategories,
        Permission::ManageInventory,
        Permission::ViewOrders,
        Permission::ManageOrders,
        Permission::FulfillOrders,
        Permission::PlaceOrders,
        Permission::ViewUsers,
        Permission::ManageUsers,
        Permission::ManageRoles,
        Permission::ModerateReviews,
        Permission::WriteReviews,
        Permission::ManageVendors,
        Permission::ViewReports,
        Permission::ViewTaxReports,
        Permission::ManageSettings,
        Permission::ManageOwnProfile,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Permission::ViewProducts => "VIEW_PRODUCTS",
            Permission::CreateProducts => "CREATE_PRODUCTS",
            Permission::EditProducts => "EDIT_PRODUCTS",
            Permission::DeleteProducts => "DELETE_PRODUCTS",
            Permission::ApproveProducts => "APPROVE_PRODUCTS",
            Permission::ManageCategories => "MANAGE_CATEGORIES",
            Permission::ManageInventory => "MANAGE_INVENTORY",
            Permission::ViewOrders => "VIEW_ORDERS",
            Permission::ManageOrders => "MANAGE_ORDERS",
            Permission::FulfillOrders => "FULFILL_ORDERS",
            Permission::PlaceOrders => "PLACE_ORDERS",
            Permission::ViewUsers => "VIEW_USERS",
            Permission::ManageUsers => "MANAGE_USERS",
            Permission::ManageRoles => "MANAGE_ROLES",
            Permission::ModerateReviews => "MODERATE_REVIEWS",
            Permission::WriteReviews => "WRITE_REVIEWS",
            Permission::ManageVendors => "MANAGE_VENDORS",
            Permission::ViewReports => "VIEW_REPORTS",
            Permission::ViewTaxReports => "VIEW_TAX_REPORTS",
            Permission::ManageSettings => "MANAGE_SETTINGS",
            Permission::ManageOwnProfile => "MANAGE_OWN_PROFILE",
        }
    }

    pub fn parse(code: &str) -> Option<Permission> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.code().eq_ignore_ascii_case(code))
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
