//! 角色 → 权限目录
//!
//! 编译期固定的数据，进程内只构建一次，之后只读

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use super::{Permission, Role};

pub const ADMIN_PERMISSIONS: &[Permission] = &Permission::ALL;

pub const MODERATOR_PERMISSIONS: &[Permission] = &[
    Permission::ViewProducts,
    Permission::ApproveProducts,
    Permission::EditProducts,
    Permission::ModerateReviews,
    Permission::ViewUsers,
    Permission::ViewOrders,
    Permission::ManageCategories,
];

pub const ACCOUNTANT_PERMISSIONS: &[Permission] = &[
    Permission::ViewOrders,
    Permission::ViewReports,
    Permission::ViewTaxReports,
];

pub const VENDOR_STAFF_PERMISSIONS: &[Permission] = &[
    Permission::ViewProducts,
    Permission::CreateProducts,
    Permission::EditProducts,
    Permission::DeleteProducts,
    Permission::ManageInventory,
    Permission::ViewOrders,
    Permission::FulfillOrders,
    Permission::ViewReports,
    Permission::ManageOwnProfile,
];

pub const WAREHOUSE_STAFF_PERMISSIONS: &[Permission] = &[
    Permission::ViewProducts,
    Permission::ManageInventory,
    Permission::ViewOrders,
    Permission::FulfillOrders,
];

pub const CUSTOMER_PERMISSIONS: &[Permission] = &[
    Permission::ViewProducts,
    Permission::PlaceOrders,
    Permission::ViewOrders,
    Permission::WriteReviews,
    Permission::ManageOwnProfile,
];

pub const GUEST_PERMISSIONS: &[Permission] = &[Permission::ViewProducts];

static CATALOG: LazyLock<RoleCatalog> = LazyLock::new(RoleCatalog::build);

static EMPTY: BTreeSet<Permission> = BTreeSet::new();

/// 角色权限目录
#[derive(Debug)]
pub struct RoleCatalog {
    grants: HashMap<Role, BTreeSet<Permission>>,
}

impl RoleCatalog {
    /// 进程级共享目录
    pub fn global() -> &'static RoleCatalog {
        &CATALOG
    }

    fn build() -> Self {
        let grants = Role::ALL
            .into_iter()
            .map(|role| {
                let permissions = match role {
                    Role::Admin => ADMIN_PERMISSIONS,
                    Role::Moderator => MODERATOR_PERMISSIONS,
                    Role::Accountant => ACCOUNTANT_PERMISSIONS,
                    Role::VendorStaff => VENDOR_STAFF_PERMISSIONS,
                    Role::WarehouseStaff => WAREHOUSE_STAFF_PERMISSIONS,
                    Role::Customer => CUSTOMER_PERMISSIONS,
                    Role::Guest => GUEST_PERMISSIONS,
                };
                (role, permissions.iter().copied().collect())
            })
            .collect();
        Self { grants }
    }

    pub fn permissions_for(&self, role: Role) -> &BTreeSet<Permission> {
        self.grants.get(&role).unwrap_or(&EMPTY)
    }

    /// 按角色代码查询；未知代码返回空集合
    pub fn permissions_for_code(&self, code: &str) -> &BTreeSet<Permission> {
        match Role::parse(code) {
            Some(role) => self.permissions_for(role),
            None => &EMPTY,
        }
    }

    /// 多个角色的权限并集
    pub fn flatten<'a>(&self, roles: impl IntoIterator<Item = &'a Role>) -> BTreeSet<Permission> {
        roles
            .into_iter()
            .flat_map(|role| self.permissions_for(*role).iter().copied())
            .collect()
    }
}
