//! The dashboard's navigation configuration.
//!
//! Static, read-only at runtime. Section and entry order here is the render
//! order; the permission filter never reorders survivors.

use washdesk_auth::Requirement;

use crate::entry::{MenuSection, NavEntry};

/// Disjunction over the five CRUD-style actions of a resource, e.g.
/// `orders.index||orders.store||orders.show||orders.update||orders.destroy`.
fn crud(resource: &str) -> Requirement {
    Requirement::any(
        ["index", "store", "show", "update", "destroy"]
            .iter()
            .map(|action| format!("{resource}.{action}")),
    )
}

/// The full menu tree of the laundry dashboard.
pub fn default_menu() -> Vec<MenuSection> {
    vec![
        MenuSection::new(
            "Main",
            vec![
                NavEntry::group(
                    "Dashboard",
                    "grid",
                    vec![NavEntry::item("Business Overview", "/")],
                ),
                NavEntry::leaf("Calendar", "calendar", "/calendar"),
                NavEntry::group(
                    "Forms",
                    "list",
                    vec![NavEntry::item("Form Elements", "/form-elements")],
                ),
                NavEntry::group(
                    "Tables",
                    "table",
                    vec![NavEntry::item("Basic Tables", "/basic-tables")],
                ),
                NavEntry::group(
                    "Pages",
                    "page",
                    vec![
                        NavEntry::item("Blank Page", "/blank"),
                        NavEntry::item("404 Error", "/error-404"),
                    ],
                ),
            ],
        ),
        MenuSection::new(
            "User",
            vec![
                NavEntry::group(
                    "User Management",
                    "users",
                    vec![
                        NavEntry::item("View All Users", "/all-users")
                            .require(Requirement::single("users.show")),
                        NavEntry::item("Add New User", "/add-user")
                            .require(Requirement::single("register")),
                    ],
                )
                .require(crud("users")),
            ],
        )
        .require(crud("users")),
        MenuSection::new(
            "Customer Operations",
            vec![
                NavEntry::group(
                    "Customer Management",
                    "users",
                    vec![NavEntry::item("View All Customers", "/all-customers")
                        .require(Requirement::single("customers.show"))],
                )
                .require(crud("customers")),
                NavEntry::group(
                    "Order Management",
                    "file-text",
                    vec![
                        NavEntry::item("List of All Orders", "/all-orders")
                            .require(Requirement::single("orders.index")),
                        NavEntry::item("Create New Order", "/new-order")
                            .require(Requirement::single("orders.store")),
                    ],
                )
                .require(crud("orders")),
                NavEntry::group(
                    "Order Item Management",
                    "package",
                    vec![
                        NavEntry::item("View Order Items", "/order-items")
                            .require(Requirement::single("order-items.index")),
                        NavEntry::item("Add New Order Item", "/order-items/new")
                            .require(Requirement::single("order-items.store")),
                    ],
                )
                .require(crud("order-items")),
            ],
        )
        .require(crud("customers")),
        MenuSection::new(
            "Services & Staff",
            vec![
                NavEntry::group(
                    "Inventory Management",
                    "box-cube",
                    vec![
                        NavEntry::item("View Stock Items", "/stock-items")
                            .require(Requirement::single("stock-items.index")),
                        NavEntry::item("Add New Stock Item", "/stock-items/new")
                            .require(Requirement::single("stock-items.store")),
                    ],
                )
                .require(crud("stock-items")),
                NavEntry::group(
                    "Service & Pricing",
                    "blocks",
                    vec![
                        NavEntry::item("Available Services", "/available-services"),
                        NavEntry::item("Add New Services", "/add-services"),
                    ],
                ),
                NavEntry::group(
                    "Staff Panel",
                    "briefcase",
                    vec![NavEntry::item("Assign Orders to Washers", "/assign-orders")],
                ),
            ],
        ),
        MenuSection::new(
            "Access Control",
            vec![
                NavEntry::group(
                    "Roles & Permissions",
                    "shield-user",
                    vec![
                        NavEntry::item("View Roles and Permissions", "/all-roles")
                            .require(Requirement::single("roles.index")),
                        NavEntry::item("Create New Roles", "/role-create")
                            .require(Requirement::single("roles.store")),
                    ],
                )
                .require(crud("roles")),
            ],
        )
        .require(crud("roles")),
        MenuSection::new(
            "Reports & Alerts",
            vec![
                NavEntry::group(
                    "Report Section",
                    "pie-chart",
                    vec![
                        NavEntry::item("Most Frequent Customers", "/reports/frequent-customers"),
                        NavEntry::item("Most Ordered Items", "/reports/ordered-items"),
                        NavEntry::item("Sales Report", "/reports/sales"),
                    ],
                ),
                NavEntry::group(
                    "Notifications & Alerts",
                    "bell",
                    vec![NavEntry::item("Low Stock Alert", "/alerts/low-stock")],
                ),
            ],
        ),
        MenuSection::new(
            "Configuration",
            vec![
                NavEntry::group(
                    "Settings",
                    "settings",
                    vec![
                        NavEntry::item("Set Shop & Currency", "/settings/shop"),
                        NavEntry::item("SMS and Email Config", "/settings/messaging"),
                    ],
                ),
                NavEntry::leaf("User Profile", "user-circle", "/profile"),
            ],
        ),
        MenuSection::new(
            "Others",
            vec![
                NavEntry::group(
                    "Authentication",
                    "plug-in",
                    vec![
                        NavEntry::item("Sign In", "/signin"),
                        NavEntry::item("Sign Up", "/add-user"),
                    ],
                ),
                NavEntry::group(
                    "Charts",
                    "pie-chart",
                    vec![
                        NavEntry::item("Line Chart", "/line-chart"),
                        NavEntry::item("Bar Chart", "/bar-chart"),
                    ],
                ),
                NavEntry::group(
                    "UI Elements",
                    "box-cube",
                    vec![
                        NavEntry::item("Alerts", "/alerts"),
                        NavEntry::item("Avatar", "/avatars"),
                        NavEntry::item("Badge", "/badge"),
                        NavEntry::item("Buttons", "/buttons"),
                        NavEntry::item("Images", "/images"),
                        NavEntry::item("Videos", "/videos"),
                    ],
                ),
            ],
        ),
    ]
}
