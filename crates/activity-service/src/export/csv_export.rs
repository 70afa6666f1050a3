//! `;`-separated exports with French column headers

use activity_core::{MessageWithParties, ReportWithAuthor, User};
use chrono::FixedOffset;
use csv::{Writer, WriterBuilder};

use super::{format_hours, DisplayDates, ExportResult};

const REPORT_DETAIL_HEADERS: [&str; 12] = [
    "Semaine ISO",
    "Nom Employé",
    "Email Employé",
    "Tâche",
    "Heures",
    "Notes Tâche",
    "Projet",
    "Difficultés",
    "Remarques",
    "Total Heures Rapport",
    "Date Création",
    "Date Mise à jour",
];

const REPORT_SUMMARY_HEADERS: [&str; 9] = [
    "Semaine ISO",
    "Nom Employé",
    "Email Employé",
    "Nombre Tâches",
    "Total Heures",
    "Difficultés",
    "Remarques",
    "Date Création",
    "Date Mise à jour",
];

const USER_HEADERS: [&str; 6] = [
    "Nom",
    "Email",
    "Rôle",
    "Statut",
    "Date Création",
    "Date Mise à jour",
];

const MESSAGE_HEADERS: [&str; 7] = [
    "Expéditeur",
    "Destinataire",
    "Sujet",
    "Contenu",
    "Lu",
    "Date Lecture",
    "Date Envoi",
];

/// CSV renderer. The header row is written even when there are no rows.
#[derive(Debug, Clone, Copy)]
pub struct CsvExporter {
    dates: DisplayDates,
}

impl CsvExporter {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            dates: DisplayDates::new(offset),
        }
    }

    /// One row per task when `detailed`, otherwise one row per report
    pub fn reports(&self, reports: &[ReportWithAuthor], detailed: bool) -> ExportResult<Vec<u8>> {
        let mut writer = Self::writer();

        if detailed {
            writer.write_record(REPORT_DETAIL_HEADERS)?;
            for view in reports {
                let report = &view.report;
                let week = report.week_iso.to_string();
                let total = format_hours(report.total_hours);
                let created = self.dates.datetime(report.created_at);
                let updated = self.dates.datetime(report.updated_at);

                for task in &report.tasks {
                    writer.write_record([
                        week.as_str(),
                        view.user_name.as_str(),
                        view.user_email.as_str(),
                        task.title.as_str(),
                        format_hours(task.hours).as_str(),
                        task.notes.as_deref().unwrap_or_default(),
                        task.project.as_deref().unwrap_or_default(),
                        report.difficulties.as_deref().unwrap_or_default(),
                        report.remarks.as_deref().unwrap_or_default(),
                        total.as_str(),
                        created.as_str(),
                        updated.as_str(),
                    ])?;
                }
            }
        } else {
            writer.write_record(REPORT_SUMMARY_HEADERS)?;
            for view in reports {
                let report = &view.report;
                writer.write_record([
                    report.week_iso.to_string().as_str(),
                    view.user_name.as_str(),
                    view.user_email.as_str(),
                    report.tasks_count().to_string().as_str(),
                    format_hours(report.total_hours).as_str(),
                    report.difficulties.as_deref().unwrap_or_default(),
                    report.remarks.as_deref().unwrap_or_default(),
                    self.dates.datetime(report.created_at).as_str(),
                    self.dates.datetime(report.updated_at).as_str(),
                ])?;
            }
        }

        Self::finish(writer)
    }

    /// Users in the given order; the caller sorts by name
    pub fn users(&self, users: &[User]) -> ExportResult<Vec<u8>> {
        let mut writer = Self::writer();
        writer.write_record(USER_HEADERS)?;

        for user in users {
            writer.write_record([
                user.name.as_str(),
                user.email.as_str(),
                user.role.as_str(),
                user.status.as_str(),
                self.dates.datetime(user.created_at).as_str(),
                self.dates.datetime(user.updated_at).as_str(),
            ])?;
        }

        Self::finish(writer)
    }

    pub fn messages(&self, messages: &[MessageWithParties]) -> ExportResult<Vec<u8>> {
        let mut writer = Self::writer();
        writer.write_record(MESSAGE_HEADERS)?;

        for view in messages {
            let message = &view.message;
            let read_at = message
                .read_at
                .map(|at| self.dates.datetime(at))
                .unwrap_or_default();

            writer.write_record([
                view.sender_name.as_str(),
                view.receiver_name.as_str(),
                message.subject.as_deref().unwrap_or_default(),
                message.content.as_str(),
                if message.read_status { "Oui" } else { "Non" },
                read_at.as_str(),
                self.dates.datetime(message.created_at).as_str(),
            ])?;
        }

        Self::finish(writer)
    }

    fn writer() -> Writer<Vec<u8>> {
        WriterBuilder::new().delimiter(b';').from_writer(Vec::new())
    }

    fn finish(writer: Writer<Vec<u8>>) -> ExportResult<Vec<u8>> {
        writer.into_inner().map_err(|e| e.into_error().into())
    }
}
