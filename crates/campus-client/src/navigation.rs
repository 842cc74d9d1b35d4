//! Menu gating.
//!
//! Each menu item declares the tenant-lifecycle preconditions it needs. An
//! item resolves to exactly one [`NavState`]; rules are checked in priority
//! order (platform school scope, then session, then classes), so a
//! platform admin without a school is sent to the picker rather than to
//! session setup.

use crate::notify::Notifier;
use crate::role::Role;
use crate::routes;

/// Preconditions a menu item needs before it can be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Requirements {
    /// An academic session is selected.
    pub session: bool,
    /// At least one class exists in the tenant.
    pub classes: bool,
    /// The view is school-scoped; platform users must pick a school first.
    pub school_scope: bool,
}

impl Requirements {
    const NONE: Requirements = Requirements {
        session: false,
        classes: false,
        school_scope: false,
    };
    const SCHOOL: Requirements = Requirements {
        session: false,
        classes: false,
        school_scope: true,
    };
    const SESSION: Requirements = Requirements {
        session: true,
        classes: false,
        school_scope: true,
    };
    const CLASSES: Requirements = Requirements {
        session: true,
        classes: true,
        school_scope: true,
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub key: &'static str,
    pub label: &'static str,
    pub path: &'static str,
    pub requires: Requirements,
    /// Roles that see the item; empty means everyone.
    pub roles: &'static [Role],
}

impl MenuItem {
    pub fn visible_to(&self, role: Option<Role>) -> bool {
        self.roles.is_empty() || role.is_some_and(|r| self.roles.contains(&r))
    }
}

const PLATFORM: &[Role] = &[Role::SuperAdmin, Role::PlatformAdmin];
const ADMINS: &[Role] = &[Role::SuperAdmin, Role::PlatformAdmin, Role::SchoolAdmin];
const ACADEMIC: &[Role] = &[Role::SuperAdmin, Role::PlatformAdmin, Role::SchoolAdmin, Role::Teacher];
const FINANCE: &[Role] = &[Role::SuperAdmin, Role::PlatformAdmin, Role::SchoolAdmin, Role::Accountant];
const RESULTS: &[Role] = &[
    Role::SuperAdmin,
    Role::PlatformAdmin,
    Role::SchoolAdmin,
    Role::Teacher,
    Role::Student,
    Role::Parent,
];

pub static MENU: &[MenuItem] = &[
    MenuItem {
        key: "dashboard",
        label: "Dashboard",
        path: routes::DASHBOARD,
        requires: Requirements::NONE,
        roles: &[],
    },
    MenuItem {
        key: "schools",
        label: "Schools",
        path: routes::SCHOOLS,
        requires: Requirements::NONE,
        roles: PLATFORM,
    },
    MenuItem {
        key: "academic-sessions",
        label: "Academic Sessions",
        path: routes::SESSION_SETUP,
        requires: Requirements::SCHOOL,
        roles: ADMINS,
    },
    // Classes is where a fresh session gets its first class, so it cannot
    // itself require one.
    MenuItem {
        key: "classes",
        label: "Classes",
        path: routes::CLASSES,
        requires: Requirements::SESSION,
        roles: ADMINS,
    },
    MenuItem {
        key: "students",
        label: "Students",
        path: routes::STUDENTS,
        requires: Requirements::CLASSES,
        roles: ACADEMIC,
    },
    MenuItem {
        key: "attendance",
        label: "Attendance",
        path: routes::ATTENDANCE,
        requires: Requirements::CLASSES,
        roles: ACADEMIC,
    },
    MenuItem {
        key: "exams",
        label: "Exams",
        path: routes::EXAMS,
        requires: Requirements::CLASSES,
        roles: ACADEMIC,
    },
    MenuItem {
        key: "results",
        label: "Results",
        path: routes::RESULTS,
        requires: Requirements::CLASSES,
        roles: RESULTS,
    },
    MenuItem {
        key: "fees",
        label: "Fees",
        path: routes::FEES,
        requires: Requirements::CLASSES,
        roles: FINANCE,
    },
    MenuItem {
        key: "fee-collection",
        label: "Fee Collection",
        path: routes::FEE_COLLECTION,
        requires: Requirements::CLASSES,
        roles: FINANCE,
    },
    MenuItem {
        key: "staff",
        label: "Staff",
        path: routes::STAFF,
        requires: Requirements::SCHOOL,
        roles: ADMINS,
    },
    MenuItem {
        key: "transport",
        label: "Transport",
        path: routes::TRANSPORT,
        requires: Requirements::SESSION,
        roles: FINANCE,
    },
    MenuItem {
        key: "subscription",
        label: "Subscription",
        path: routes::SUBSCRIPTION,
        requires: Requirements::SCHOOL,
        roles: ADMINS,
    },
];

/// Everything gating depends on, sampled from the stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavContext {
    pub has_session: bool,
    pub has_classes: bool,
    pub role: Option<Role>,
    pub platform_user: bool,
    pub school_selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Enabled,
    DisabledNoSchool,
    DisabledNoSession,
    DisabledNoClasses,
}

impl NavState {
    pub fn is_enabled(self) -> bool {
        self == NavState::Enabled
    }

    /// Where a click on a disabled item goes instead.
    pub fn redirect(self) -> Option<&'static str> {
        match self {
            NavState::Enabled => None,
            NavState::DisabledNoSchool => Some(routes::SCHOOL_PICKER),
            NavState::DisabledNoSession => Some(routes::SESSION_SETUP),
            NavState::DisabledNoClasses => Some(routes::CLASSES),
        }
    }

    pub fn message(self) -> Option<&'static str> {
        match self {
            NavState::Enabled => None,
            NavState::DisabledNoSchool => Some("Select a school first"),
            NavState::DisabledNoSession => Some("Create an academic session first"),
            NavState::DisabledNoClasses => Some("Create at least one class first"),
        }
    }
}

pub fn resolve(item: &MenuItem, ctx: &NavContext) -> NavState {
    let req = item.requires;
    if req.school_scope && ctx.platform_user && !ctx.school_selected {
        return NavState::DisabledNoSchool;
    }
    if req.session && !ctx.has_session {
        return NavState::DisabledNoSession;
    }
    if req.classes && !ctx.has_classes {
        return NavState::DisabledNoClasses;
    }
    NavState::Enabled
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    Navigate(&'static str),
    Blocked {
        redirect: &'static str,
        warning: &'static str,
    },
}

impl NavOutcome {
    /// The route the UI should show next.
    pub fn route(&self) -> &'static str {
        match self {
            NavOutcome::Navigate(path) => path,
            NavOutcome::Blocked { redirect, .. } => redirect,
        }
    }
}

/// Handle a menu click. A blocked click raises a warning and never yields
/// the item's own route.
pub fn click(item: &MenuItem, ctx: &NavContext, notifier: &Notifier) -> NavOutcome {
    let state = resolve(item, ctx);
    match (state.redirect(), state.message()) {
        (Some(redirect), Some(warning)) => {
            tracing::debug!(item = item.key, ?state, "menu click blocked");
            notifier.warning(warning);
            NavOutcome::Blocked { redirect, warning }
        }
        _ => NavOutcome::Navigate(item.path),
    }
}

/// Menu items visible to the context's role, each with its resolved state.
pub fn menu_for(ctx: &NavContext) -> Vec<(&'static MenuItem, NavState)> {
    MENU.iter()
        .filter(|item| item.visible_to(ctx.role))
        .map(|item| (item, resolve(item, ctx)))
        .collect()
}

pub fn find(key: &str) -> Option<&'static MenuItem> {
    MENU.iter().find(|item| item.key == key)
}

/// Whether `role` may open `path`: the most specific menu entry covering
/// the path decides; paths outside the menu are open to any signed-in user.
pub fn authorize(role: Option<Role>, path: &str) -> bool {
    MENU.iter()
        .filter(|item| routes::matches_prefix(path, item.path))
        .max_by_key(|item| item.path.len())
        .map_or(true, |item| item.visible_to(role))
}
