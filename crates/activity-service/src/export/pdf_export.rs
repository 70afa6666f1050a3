//! A4 PDF exports drawn with the built-in Helvetica faces

use std::collections::{HashMap, HashSet};

use activity_core::{truncate_text, RecordId, ReportWithAuthor, User, WeeklyStats};
use chrono::{DateTime, FixedOffset, Utc};
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};

use super::{DisplayDates, ExportError, ExportResult};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;

const TITLE_SIZE: f32 = 16.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const TABLE_SIZE: f32 = 8.0;

/// Task lines listed under each report before the remainder is summarised
const TASKS_PER_REPORT: usize = 3;

const NO_REPORTS: &str = "Aucun rapport trouvé pour les critères sélectionnés.";
const NO_USERS: &str = "Aucun utilisateur trouvé.";

/// Report table columns: Semaine, Employé, Tâches, Heures, Date
const REPORT_COLUMNS: [f32; 5] = [20.0, 45.0, 85.0, 150.0, 168.0];
/// User table columns: Nom, Email, Rôle, Statut
const USER_COLUMNS: [f32; 4] = [20.0, 70.0, 140.0, 165.0];
/// Weekly task columns: Tâche, Heures, Projet, Notes
const TASK_COLUMNS: [f32; 4] = [25.0, 95.0, 115.0, 145.0];

/// Cursor over an A4 document that opens a new page when the current one fills
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
    pages: usize,
}

impl PageWriter {
    fn new(title: &str) -> ExportResult<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Calque 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN,
            pages: 1,
        })
    }

    /// Line height in mm for a font size in points
    fn leading(size: f32) -> f32 {
        size * 0.5
    }

    fn ensure_room(&mut self, height: f32) {
        if self.y - height < MARGIN {
            let (page, layer) = self.doc.add_page(
                Mm(PAGE_WIDTH),
                Mm(PAGE_HEIGHT),
                format!("Calque {}", self.pages + 1),
            );
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
            self.pages += 1;
        }
    }

    fn text(&mut self, text: &str, size: f32, bold: bool) {
        self.row(&[(MARGIN, text)], size, bold);
    }

    /// One line of cells, each placed at its own x offset
    fn row(&mut self, cells: &[(f32, &str)], size: f32, bold: bool) {
        let height = Self::leading(size);
        self.ensure_room(height);
        self.y -= height;
        let font = if bold { &self.bold } else { &self.regular };
        for (x, text) in cells {
            if !text.is_empty() {
                self.layer.use_text(*text, size, Mm(*x), Mm(self.y), font);
            }
        }
    }

    fn rule(&mut self) {
        self.ensure_room(2.0);
        self.y -= 1.5;
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN), Mm(self.y)), false),
                (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(self.y)), false),
            ],
            is_closed: false,
        });
    }

    fn gap(&mut self, height: f32) {
        self.y -= height;
    }

    fn finish(self) -> ExportResult<Vec<u8>> {
        self.doc
            .save_to_bytes()
            .map_err(|e| ExportError::Pdf(e.to_string()))
    }
}

/// PDF renderer
#[derive(Debug, Clone, Copy)]
pub struct PdfExporter {
    dates: DisplayDates,
}

impl PdfExporter {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            dates: DisplayDates::new(offset),
        }
    }

    /// Summary block then one table row per report with its first tasks
    pub fn reports(
        &self,
        title: &str,
        reports: &[ReportWithAuthor],
        generated_at: DateTime<Utc>,
    ) -> ExportResult<Vec<u8>> {
        self.render_reports(title, reports, generated_at)?.finish()
    }

    pub fn users(&self, users: &[User], generated_at: DateTime<Utc>) -> ExportResult<Vec<u8>> {
        self.render_users(users, generated_at)?.finish()
    }

    /// Stats for one week, then each employee's hours and task lines
    pub fn weekly_summary(
        &self,
        stats: &WeeklyStats,
        reports: &[ReportWithAuthor],
    ) -> ExportResult<Vec<u8>> {
        Self::render_weekly_summary(stats, reports)?.finish()
    }

    fn render_reports(
        &self,
        title: &str,
        reports: &[ReportWithAuthor],
        generated_at: DateTime<Utc>,
    ) -> ExportResult<PageWriter> {
        let mut page = PageWriter::new(title)?;
        page.text(title, TITLE_SIZE, true);
        page.text(
            &format!("Généré le {}", self.dates.datetime(generated_at)),
            BODY_SIZE,
            false,
        );
        page.gap(6.0);

        if reports.is_empty() {
            page.text(NO_REPORTS, BODY_SIZE, false);
            return Ok(page);
        }

        let total_hours: f64 = reports.iter().map(|view| view.report.total_hours).sum();
        let employees = reports
            .iter()
            .map(|view| view.report.user_id)
            .collect::<HashSet<RecordId>>()
            .len();

        page.text("Résumé", HEADING_SIZE, true);
        page.text(&format!("Nombre de rapports: {}", reports.len()), BODY_SIZE, false);
        page.text(&format!("Total des heures: {total_hours:.1}h"), BODY_SIZE, false);
        page.text(&format!("Employés ayant reporté: {employees}"), BODY_SIZE, false);
        page.gap(6.0);

        page.text("Détail des Rapports", HEADING_SIZE, true);
        let [week_x, name_x, tasks_x, hours_x, date_x] = REPORT_COLUMNS;
        page.row(
            &[
                (week_x, "Semaine"),
                (name_x, "Employé"),
                (tasks_x, "Tâches"),
                (hours_x, "Heures"),
                (date_x, "Date"),
            ],
            BODY_SIZE,
            true,
        );
        page.rule();

        for view in reports {
            let report = &view.report;
            page.row(
                &[
                    (week_x, report.week_iso.to_string().as_str()),
                    (name_x, truncate_text(&view.user_name, 20).as_str()),
                    (tasks_x, format!("{} tâche(s)", report.tasks_count()).as_str()),
                    (hours_x, format!("{:.1}h", report.total_hours).as_str()),
                    (date_x, self.dates.date(report.created_at).as_str()),
                ],
                TABLE_SIZE,
                false,
            );

            for task in report.tasks.iter().take(TASKS_PER_REPORT) {
                let line = truncate_text(&format!("• {} ({}h)", task.title, task.hours), 40);
                page.row(&[(tasks_x, line.as_str())], TABLE_SIZE, false);
            }
            if report.tasks.len() > TASKS_PER_REPORT {
                let more = format!("… et {} autre(s)", report.tasks.len() - TASKS_PER_REPORT);
                page.row(&[(tasks_x, more.as_str())], TABLE_SIZE, false);
            }
        }

        Ok(page)
    }

    fn render_users(&self, users: &[User], generated_at: DateTime<Utc>) -> ExportResult<PageWriter> {
        let title = "Liste des Utilisateurs";
        let mut page = PageWriter::new(title)?;
        page.text(title, TITLE_SIZE, true);
        page.text(
            &format!("Généré le {}", self.dates.datetime(generated_at)),
            BODY_SIZE,
            false,
        );
        page.gap(6.0);

        if users.is_empty() {
            page.text(NO_USERS, BODY_SIZE, false);
            return Ok(page);
        }

        let [name_x, email_x, role_x, status_x] = USER_COLUMNS;
        page.row(
            &[
                (name_x, "Nom"),
                (email_x, "Email"),
                (role_x, "Rôle"),
                (status_x, "Statut"),
            ],
            BODY_SIZE,
            true,
        );
        page.rule();

        for user in users {
            page.row(
                &[
                    (name_x, truncate_text(&user.name, 30).as_str()),
                    (email_x, truncate_text(&user.email, 40).as_str()),
                    (role_x, user.role.as_str()),
                    (status_x, user.status.as_str()),
                ],
                TABLE_SIZE,
                false,
            );
        }

        Ok(page)
    }

    fn render_weekly_summary(
        stats: &WeeklyStats,
        reports: &[ReportWithAuthor],
    ) -> ExportResult<PageWriter> {
        let title = format!("Résumé Hebdomadaire - {}", stats.week_iso);
        let mut page = PageWriter::new(&title)?;
        page.text(&title, TITLE_SIZE, true);
        page.gap(6.0);

        page.text("Statistiques", HEADING_SIZE, true);
        page.text(&format!("Nombre de rapports: {}", stats.total_reports), BODY_SIZE, false);
        page.text(&format!("Total des heures: {:.1}h", stats.total_hours), BODY_SIZE, false);
        page.text(
            &format!("Employés ayant reporté: {}", stats.employees_reported),
            BODY_SIZE,
            false,
        );
        page.text(
            &format!(
                "Moyenne heures/employé: {:.1}h",
                stats.average_hours_per_employee()
            ),
            BODY_SIZE,
            false,
        );
        page.gap(6.0);

        if reports.is_empty() {
            return Ok(page);
        }

        page.text("Détail par Employé", HEADING_SIZE, true);
        let [title_x, hours_x, project_x, notes_x] = TASK_COLUMNS;

        for (name, employee_reports) in group_by_employee(reports) {
            let hours: f64 = employee_reports.iter().map(|view| view.report.total_hours).sum();
            page.gap(3.0);
            page.text(&format!("{name} - {hours:.1}h"), BODY_SIZE, true);
            page.row(
                &[
                    (title_x, "Tâche"),
                    (hours_x, "Heures"),
                    (project_x, "Projet"),
                    (notes_x, "Notes"),
                ],
                TABLE_SIZE,
                true,
            );

            for task in employee_reports.iter().flat_map(|view| &view.report.tasks) {
                let project = truncate_text(task.project.as_deref().unwrap_or_default(), 15);
                let notes = truncate_text(task.notes.as_deref().unwrap_or_default(), 20);
                page.row(
                    &[
                        (title_x, truncate_text(&task.title, 30).as_str()),
                        (hours_x, format!("{:.1}h", task.hours).as_str()),
                        (project_x, project.as_str()),
                        (notes_x, notes.as_str()),
                    ],
                    TABLE_SIZE,
                    false,
                );
            }
        }

        Ok(page)
    }
}

/// Reports grouped per author, in order of first appearance
fn group_by_employee(reports: &[ReportWithAuthor]) -> Vec<(&str, Vec<&ReportWithAuthor>)> {
    let mut index: HashMap<RecordId, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&ReportWithAuthor>)> = Vec::new();

    for view in reports {
        let slot = *index.entry(view.report.user_id).or_insert_with(|| {
            groups.push((view.user_name.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(view);
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use activity_core::{IsoWeek, Report, Role, Task};
    use chrono::TimeZone;

    fn exporter() -> PdfExporter {
        PdfExporter::new(FixedOffset::east_opt(0).unwrap())
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 17, 14, 30, 0).unwrap()
    }

    fn report(id: i64, user_id: i64, name: &str, tasks: usize) -> ReportWithAuthor {
        let tasks = (0..tasks).map(|i| Task::new(format!("Tâche {i}"), 2.0)).collect();
        ReportWithAuthor {
            report: Report::new(
                RecordId::new(id),
                RecordId::new(user_id),
                IsoWeek::new(2024, 5).unwrap(),
                tasks,
                None,
                None,
            )
            .unwrap(),
            user_name: name.into(),
            user_email: format!("{}@sahelys.bf", name.to_lowercase()),
        }
    }

    #[test]
    fn test_empty_exports_still_render() {
        let bytes = exporter().reports("Rapports", &[], now()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let bytes = exporter().users(&[], now()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_long_report_list_flows_onto_new_pages() {
        let reports: Vec<_> = (0..80).map(|i| report(i, i, "Awa", 5)).collect();
        let page = exporter().render_reports("Rapports", &reports, now()).unwrap();
        assert!(page.pages > 1);
        assert!(page.finish().unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn test_users_render() {
        let users = vec![
            User::new(RecordId::new(1), "awa@sahelys.bf", "Awa".into(), Role::Employee),
            User::new(RecordId::new(2), "admin@sahelys.bf", "Admin".into(), Role::Admin),
        ];
        let page = exporter().render_users(&users, now()).unwrap();
        assert_eq!(page.pages, 1);
    }

    #[test]
    fn test_weekly_summary_renders() {
        let stats = WeeklyStats {
            week_iso: IsoWeek::new(2024, 5).unwrap(),
            total_reports: 2,
            total_hours: 10.0,
            employees_reported: 2,
        };
        let reports = vec![report(1, 1, "Awa", 2), report(2, 2, "Moussa", 3)];
        let bytes = exporter().weekly_summary(&stats, &reports).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_group_by_employee_keeps_first_seen_order() {
        let reports = vec![
            report(1, 2, "Moussa", 1),
            report(2, 1, "Awa", 1),
            report(3, 2, "Moussa", 1),
        ];
        let groups = group_by_employee(&reports);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "Moussa");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "Awa");
    }
}
