// crates/civiserve-core/src/core/registry.rs
// ============================================================================
// Module: Routine and Report Registries
// Description: Closed allow-lists mapping logical names to exact SQL
//              invocation templates.
// Purpose: Guarantee that only registered statements ever run through the
//          routine bridge and the reporting engine.
// Dependencies: none
// ============================================================================

//! ## Overview
//! The bridge never builds SQL from caller input. Every callable routine
//! (procedure, function, view) and every report is registered here with its
//! exact statement template and declared parameters; lookups outside the
//! registry fail before any database round trip. Both registries are built
//! once at startup and only ever read afterwards, so unsynchronized
//! concurrent reads are safe.

// ============================================================================
// SECTION: Routine Kinds
// ============================================================================

/// The three routine families the bridge can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutineKind {
    /// Stored-procedure style invocation; may return rows or mutate.
    Procedure,
    /// Scalar function; returns exactly one single-key row.
    Function,
    /// Whitelisted read-only view.
    View,
}

/// A registered routine and its exact invocation template.
///
/// # Invariants
/// - `sql` references only positional placeholders `?1..?n` with
///   `n == params.len()`.
/// - `mutating` is `false` for every function and view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutineSpec {
    /// Logical routine name used on the wire.
    pub name: &'static str,
    /// Routine family.
    pub kind: RoutineKind,
    /// Exact statement template; never interpolated with caller input.
    pub sql: &'static str,
    /// Declared parameter names in binding order.
    pub params: &'static [&'static str],
    /// Whether the routine mutates state.
    pub mutating: bool,
}

// ============================================================================
// SECTION: Routine Templates
// ============================================================================

/// Per-citizen request/grievance/payment summary.
const SP_GET_CITIZEN_SUMMARY: &str = "SELECT c.Citizen_ID, c.Name, \
     COUNT(DISTINCT sr.Request_ID) AS Total_Requests, \
     COUNT(DISTINCT g.Grievance_ID) AS Total_Grievances, \
     COALESCE(SUM(p.Amount), 0) AS Total_Paid \
     FROM Citizen c \
     LEFT JOIN Service_Request sr ON sr.Citizen_ID = c.Citizen_ID \
     LEFT JOIN Grievance g ON g.Citizen_ID = c.Citizen_ID \
     LEFT JOIN Payment p ON p.Payment_ID = sr.Payment_ID \
     WHERE c.Citizen_ID = ?1 \
     GROUP BY c.Citizen_ID, c.Name";

/// Per-department service/request/grievance counters.
const SP_GET_DEPARTMENT_STATS: &str = "SELECT d.Department_ID, d.Department_Name, \
     COUNT(DISTINCT s.Service_ID) AS Total_Services, \
     COUNT(DISTINCT sr.Request_ID) AS Total_Requests, \
     COUNT(DISTINCT g.Grievance_ID) AS Total_Grievances \
     FROM Department d \
     LEFT JOIN Service s ON s.Department_ID = d.Department_ID \
     LEFT JOIN Service_Request sr ON sr.Service_ID = s.Service_ID \
     LEFT JOIN Grievance g ON g.Department_ID = d.Department_ID \
     WHERE d.Department_ID = ?1 \
     GROUP BY d.Department_ID, d.Department_Name";

/// Marks a grievance resolved and records who resolved it.
const SP_MARK_GRIEVANCE_RESOLVED: &str = "UPDATE Grievance \
     SET Status = 'Resolved', \
         Description = Description || ' (resolved by ' || ?2 || ')' \
     WHERE Grievance_ID = ?1";

/// Total completed payment volume attributable to a citizen.
const FN_TOTAL_PAID_BY_CITIZEN: &str = "SELECT COALESCE(SUM(p.Amount), 0) AS total \
     FROM Payment p \
     JOIN Service_Request sr ON sr.Payment_ID = p.Payment_ID \
     WHERE sr.Citizen_ID = ?1";

/// Number of service requests filed by a citizen.
const FN_COUNT_REQUESTS_BY_CITIZEN: &str =
    "SELECT COUNT(*) AS cnt FROM Service_Request WHERE Citizen_ID = ?1";

/// Average payment amount for a service.
const FN_AVG_PAYMENT_BY_SERVICE: &str = "SELECT AVG(p.Amount) AS avg_amt \
     FROM Payment p \
     JOIN Service_Request sr ON sr.Payment_ID = p.Payment_ID \
     WHERE sr.Service_ID = ?1";

/// Open grievance count for a department.
const FN_OPEN_GRIEVANCES_BY_DEPARTMENT: &str = "SELECT COUNT(*) AS open_cnt \
     FROM Grievance \
     WHERE Department_ID = ?1 AND Status IN ('Submitted', 'Under Review')";

/// Whether a citizen has any service request on record.
const FN_IS_CITIZEN_ACTIVE: &str = "SELECT EXISTS(\
     SELECT 1 FROM Service_Request WHERE Citizen_ID = ?1) AS active";

/// Fixed select over the per-citizen payment totals view.
const VIEW_TOTAL_PAID_PER_CITIZEN: &str = "SELECT * FROM view_total_paid_per_citizen";

/// Fixed select over the per-service request counts view.
const VIEW_REQUEST_COUNTS_PER_SERVICE: &str = "SELECT * FROM view_request_counts_per_service";

/// Fixed select over the per-department open grievance view.
const VIEW_OPEN_GRIEVANCES_PER_DEPARTMENT: &str =
    "SELECT * FROM view_open_grievances_per_department";

// ============================================================================
// SECTION: Routine Registry
// ============================================================================

/// Immutable allow-list of callable routines.
///
/// # Invariants
/// - Built once at startup; read-only afterwards.
/// - Lookup misses never reach the database.
#[derive(Debug, Clone)]
pub struct RoutineRegistry {
    /// Registered routines; small and scanned linearly.
    entries: Vec<RoutineSpec>,
}

impl RoutineRegistry {
    /// Builds the registry of engine-hosted routines the gateway bridges to.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                RoutineSpec {
                    name: "citizen_summary",
                    kind: RoutineKind::Procedure,
                    sql: SP_GET_CITIZEN_SUMMARY,
                    params: &["citizen_id"],
                    mutating: false,
                },
                RoutineSpec {
                    name: "department_stats",
                    kind: RoutineKind::Procedure,
                    sql: SP_GET_DEPARTMENT_STATS,
                    params: &["department_id"],
                    mutating: false,
                },
                RoutineSpec {
                    name: "mark_grievance_resolved",
                    kind: RoutineKind::Procedure,
                    sql: SP_MARK_GRIEVANCE_RESOLVED,
                    params: &["grievance_id", "resolved_by"],
                    mutating: true,
                },
                RoutineSpec {
                    name: "total_paid",
                    kind: RoutineKind::Function,
                    sql: FN_TOTAL_PAID_BY_CITIZEN,
                    params: &["citizen_id"],
                    mutating: false,
                },
                RoutineSpec {
                    name: "count_requests",
                    kind: RoutineKind::Function,
                    sql: FN_COUNT_REQUESTS_BY_CITIZEN,
                    params: &["citizen_id"],
                    mutating: false,
                },
                RoutineSpec {
                    name: "avg_payment",
                    kind: RoutineKind::Function,
                    sql: FN_AVG_PAYMENT_BY_SERVICE,
                    params: &["service_id"],
                    mutating: false,
                },
                RoutineSpec {
                    name: "open_grievances",
                    kind: RoutineKind::Function,
                    sql: FN_OPEN_GRIEVANCES_BY_DEPARTMENT,
                    params: &["department_id"],
                    mutating: false,
                },
                RoutineSpec {
                    name: "is_citizen_active",
                    kind: RoutineKind::Function,
                    sql: FN_IS_CITIZEN_ACTIVE,
                    params: &["citizen_id"],
                    mutating: false,
                },
                RoutineSpec {
                    name: "view_total_paid_per_citizen",
                    kind: RoutineKind::View,
                    sql: VIEW_TOTAL_PAID_PER_CITIZEN,
                    params: &[],
                    mutating: false,
                },
                RoutineSpec {
                    name: "view_request_counts_per_service",
                    kind: RoutineKind::View,
                    sql: VIEW_REQUEST_COUNTS_PER_SERVICE,
                    params: &[],
                    mutating: false,
                },
                RoutineSpec {
                    name: "view_open_grievances_per_department",
                    kind: RoutineKind::View,
                    sql: VIEW_OPEN_GRIEVANCES_PER_DEPARTMENT,
                    params: &[],
                    mutating: false,
                },
            ],
        }
    }

    /// Looks up a routine by family and logical name.
    #[must_use]
    pub fn get(&self, kind: RoutineKind, name: &str) -> Option<&RoutineSpec> {
        self.entries.iter().find(|spec| spec.kind == kind && spec.name == name)
    }
}

// ============================================================================
// SECTION: Report Registry
// ============================================================================

/// A registered aggregation report.
///
/// # Invariants
/// - `takes_limit` is the only caller-variable input; no SQL fragment from a
///   caller is ever interpolated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSpec {
    /// Logical report name used on the wire.
    pub name: &'static str,
    /// Exact read-only statement template.
    pub sql: &'static str,
    /// Whether the template binds a `?1` result-size limit.
    pub takes_limit: bool,
}

/// Headline counters rendered as a single row.
const REPORT_DASHBOARD_STATS: &str = "SELECT \
     (SELECT COUNT(*) FROM Citizen) AS total_citizens, \
     (SELECT COUNT(*) FROM Service_Request) AS total_requests, \
     (SELECT COUNT(*) FROM Grievance) AS total_grievances, \
     (SELECT COALESCE(SUM(Amount), 0) FROM Payment WHERE Status = 'Completed') \
         AS total_revenue, \
     (SELECT COUNT(*) FROM Service_Request WHERE Status IN ('Pending', 'Processing')) \
         AS pending_requests, \
     (SELECT COUNT(*) FROM Grievance WHERE Status IN ('Submitted', 'Under Review')) \
         AS open_grievances";

/// Most recent service requests joined with their context.
const REPORT_RECENT_REQUESTS: &str = "SELECT sr.Request_ID, c.Name AS Citizen_Name, \
     s.Service_Name, d.Department_Name, sr.Request_Date, sr.Status, \
     p.Amount, p.Payment_Method \
     FROM Service_Request sr \
     INNER JOIN Citizen c ON sr.Citizen_ID = c.Citizen_ID \
     INNER JOIN Service s ON sr.Service_ID = s.Service_ID \
     INNER JOIN Department d ON s.Department_ID = d.Department_ID \
     LEFT JOIN Payment p ON sr.Payment_ID = p.Payment_ID \
     ORDER BY sr.Request_Date DESC \
     LIMIT ?1";

/// Per-department workload and completion rate. The rate divides by a
/// NULLIF-guarded denominator so departments with no requests report null,
/// never zero.
const REPORT_DEPARTMENT_PERFORMANCE: &str = "SELECT d.Department_Name, \
     COUNT(sr.Request_ID) AS Total_Requests, \
     COUNT(CASE WHEN sr.Status = 'Completed' THEN 1 END) AS Completed_Requests, \
     COUNT(CASE WHEN sr.Status = 'Pending' THEN 1 END) AS Pending_Requests, \
     COALESCE(SUM(p.Amount), 0) AS Total_Revenue, \
     ROUND(COUNT(CASE WHEN sr.Status = 'Completed' THEN 1 END) * 100.0 / \
           NULLIF(COUNT(sr.Request_ID), 0), 2) AS Completion_Rate \
     FROM Department d \
     LEFT JOIN Service s ON d.Department_ID = s.Department_ID \
     LEFT JOIN Service_Request sr ON s.Service_ID = sr.Service_ID \
     LEFT JOIN Payment p ON sr.Payment_ID = p.Payment_ID AND p.Status = 'Completed' \
     GROUP BY d.Department_ID, d.Department_Name \
     ORDER BY Total_Requests DESC";

/// Twelve most recent month buckets of request volume.
const REPORT_MONTHLY_TRENDS: &str = "SELECT strftime('%Y-%m', sr.Request_Date) AS Month, \
     COUNT(sr.Request_ID) AS Total_Requests, \
     COALESCE(SUM(p.Amount), 0) AS Total_Revenue, \
     COUNT(DISTINCT sr.Citizen_ID) AS Unique_Citizens \
     FROM Service_Request sr \
     LEFT JOIN Payment p ON sr.Payment_ID = p.Payment_ID AND p.Status = 'Completed' \
     GROUP BY strftime('%Y-%m', sr.Request_Date) \
     ORDER BY Month DESC \
     LIMIT 12";

/// Immutable allow-list of aggregation reports.
///
/// # Invariants
/// - Built once at startup; read-only afterwards.
#[derive(Debug, Clone)]
pub struct ReportRegistry {
    /// Registered reports; small and scanned linearly.
    entries: Vec<ReportSpec>,
}

impl ReportRegistry {
    /// Builds the fixed dashboard report set.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                ReportSpec {
                    name: "dashboard_stats",
                    sql: REPORT_DASHBOARD_STATS,
                    takes_limit: false,
                },
                ReportSpec {
                    name: "recent_requests",
                    sql: REPORT_RECENT_REQUESTS,
                    takes_limit: true,
                },
                ReportSpec {
                    name: "department_performance",
                    sql: REPORT_DEPARTMENT_PERFORMANCE,
                    takes_limit: false,
                },
                ReportSpec {
                    name: "monthly_trends",
                    sql: REPORT_MONTHLY_TRENDS,
                    takes_limit: false,
                },
            ],
        }
    }

    /// Looks up a report by logical name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ReportSpec> {
        self.entries.iter().find(|spec| spec.name == name)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions."
)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_miss_without_touching_anything() {
        let routines = RoutineRegistry::builtin();
        assert!(routines.get(RoutineKind::View, "view_does_not_exist").is_none());
        assert!(routines.get(RoutineKind::Procedure, "citizen_summary").is_some());
        // Same name, wrong family: not registered.
        assert!(routines.get(RoutineKind::Function, "citizen_summary").is_none());
    }

    #[test]
    fn views_and_functions_are_never_mutating() {
        let routines = RoutineRegistry::builtin();
        for name in [
            "view_total_paid_per_citizen",
            "view_request_counts_per_service",
            "view_open_grievances_per_department",
        ] {
            let spec = routines.get(RoutineKind::View, name).unwrap();
            assert!(!spec.mutating);
            assert!(spec.params.is_empty());
        }
        for name in [
            "total_paid",
            "count_requests",
            "avg_payment",
            "open_grievances",
            "is_citizen_active",
        ] {
            let spec = routines.get(RoutineKind::Function, name).unwrap();
            assert!(!spec.mutating);
        }
    }

    #[test]
    fn templates_are_single_statements() {
        let routines = RoutineRegistry::builtin();
        for spec in [
            routines.get(RoutineKind::Procedure, "citizen_summary").unwrap(),
            routines.get(RoutineKind::Procedure, "mark_grievance_resolved").unwrap(),
            routines.get(RoutineKind::Function, "total_paid").unwrap(),
        ] {
            assert!(!spec.sql.contains(';'));
        }
    }

    #[test]
    fn report_registry_is_closed() {
        let reports = ReportRegistry::builtin();
        assert!(reports.get("dashboard_stats").is_some());
        assert!(reports.get("recent_requests").unwrap().takes_limit);
        assert!(reports.get("made_up_report").is_none());
    }
}
