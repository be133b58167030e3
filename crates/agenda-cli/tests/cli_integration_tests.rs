//! CLI integration tests for agenda
//!
//! Drives the binary end-to-end against a throwaway database file.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command wired to an isolated database under `dir`
#[allow(deprecated)]
fn agenda_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("agenda").unwrap();
    cmd.env("AGENDA_DB_PATH", dir.path().join("agenda.db"));
    cmd.env("AGENDA_CONFIG", dir.path().join("missing-config.toml"));
    cmd
}

/// Pull the first uuid-shaped token out of a command's output
fn extract_id(output: &[u8]) -> String {
    let text = String::from_utf8_lossy(output);
    text.split(|c: char| c.is_whitespace() || c == '(' || c == ')')
        .find(|token| token.len() == 36 && token.chars().filter(|c| *c == '-').count() == 4)
        .expect("output carries an id")
        .to_string()
}

#[test]
fn test_doctor_reports_healthy_database() {
    let dir = TempDir::new().unwrap();
    agenda_cmd(&dir)
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("Database: ok"));
}

#[test]
fn test_log_lines_stay_off_stdout() {
    let dir = TempDir::new().unwrap();

    // First run applies migrations, which log at INFO. Those lines must
    // land on stderr so stdout stays machine-readable.
    let output = agenda_cmd(&dir).arg("doctor").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("INFO"), "log lines leaked to stdout: {stdout}");
    assert!(stdout.contains("Database: ok"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("INFO"), "migration logs expected on stderr");
}

#[test]
fn test_client_registration_and_listing() {
    let dir = TempDir::new().unwrap();

    agenda_cmd(&dir)
        .args(["clients", "add", "Ana Souza", "--email", "ana@example.test"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Client registered: Ana Souza"));

    agenda_cmd(&dir)
        .args(["clients", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ana Souza"));

    // Duplicate e-mail is refused.
    agenda_cmd(&dir)
        .args(["clients", "add", "Outra Ana", "--email", "ana@example.test"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already in use"));
}

#[test]
fn test_client_soft_delete_hides_from_default_listing() {
    let dir = TempDir::new().unwrap();

    let output = agenda_cmd(&dir)
        .args(["clients", "add", "Bia Martins"])
        .output()
        .unwrap();
    let id = extract_id(&output.stdout);

    agenda_cmd(&dir)
        .args(["clients", "remove", &id])
        .assert()
        .success();

    agenda_cmd(&dir)
        .args(["clients", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No clients found."));

    agenda_cmd(&dir)
        .args(["clients", "list", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[inactive]"));
}

#[test]
fn test_invalid_treatment_is_refused() {
    let dir = TempDir::new().unwrap();

    agenda_cmd(&dir)
        .args(["treatments", "add", "Broken", "--minutes", "0", "--price", "50"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn test_booking_conflict_and_rebooking_flow() {
    let dir = TempDir::new().unwrap();

    let client = extract_id(
        &agenda_cmd(&dir)
            .args(["clients", "add", "Joana Pereira"])
            .output()
            .unwrap()
            .stdout,
    );
    let treatment = extract_id(
        &agenda_cmd(&dir)
            .args(["treatments", "add", "Massage", "--minutes", "60", "--price", "150"])
            .output()
            .unwrap()
            .stdout,
    );
    let practitioner = extract_id(
        &agenda_cmd(&dir)
            .args(["practitioners", "add", "Rui Costa", "--email", "rui@clinic.test"])
            .output()
            .unwrap()
            .stdout,
    );

    let book = |start: &str| {
        let mut cmd = agenda_cmd(&dir);
        cmd.args(["book", &client, &treatment, &practitioner, start]);
        cmd
    };

    let output = book("2024-03-04T10:00:00Z").output().unwrap();
    assert!(output.status.success());
    let appointment = extract_id(&output.stdout);

    // Overlap is refused, the adjoining slot is fine.
    book("2024-03-04T10:30:00Z")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already taken"));
    book("2024-03-04T11:00:00Z").assert().success();

    // Cancelling frees the original slot for a new booking.
    agenda_cmd(&dir)
        .args(["status", &appointment, "cancelado"])
        .assert()
        .success();
    book("2024-03-04T10:00:00Z").assert().success();

    agenda_cmd(&dir)
        .args(["agenda", "--day", "2024-03-04"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cancelado"));

    // JSON output must be parseable on its own, nothing else on stdout.
    let output = agenda_cmd(&dir)
        .args(["agenda", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is pure JSON");
    assert_eq!(parsed.as_array().unwrap().len(), 3);
}

#[test]
fn test_unknown_status_label_is_refused() {
    let dir = TempDir::new().unwrap();

    agenda_cmd(&dir)
        .args([
            "status",
            "00000000-0000-0000-0000-000000000001",
            "pendente",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown appointment status"));
}

#[test]
fn test_client_role_cannot_book() {
    let dir = TempDir::new().unwrap();

    agenda_cmd(&dir)
        .args([
            "book",
            "00000000-0000-0000-0000-000000000001",
            "00000000-0000-0000-0000-000000000002",
            "00000000-0000-0000-0000-000000000003",
            "2024-03-04T10:00:00Z",
            "--role",
            "cliente",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not permitted"));
}

#[test]
fn test_reschedule_requires_the_owning_client() {
    let dir = TempDir::new().unwrap();

    let client = extract_id(
        &agenda_cmd(&dir)
            .args(["clients", "add", "Marta Lima"])
            .output()
            .unwrap()
            .stdout,
    );
    let treatment = extract_id(
        &agenda_cmd(&dir)
            .args(["treatments", "add", "Drainage", "--minutes", "45", "--price", "120"])
            .output()
            .unwrap()
            .stdout,
    );
    let practitioner = extract_id(
        &agenda_cmd(&dir)
            .args(["practitioners", "add", "Sofia Nunes", "--email", "sofia@clinic.test"])
            .output()
            .unwrap()
            .stdout,
    );

    let output = agenda_cmd(&dir)
        .args(["book", &client, &treatment, &practitioner, "2024-03-05T09:00:00Z"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let appointment = extract_id(&output.stdout);

    // A client acting on someone else's appointment is turned away.
    agenda_cmd(&dir)
        .args([
            "reschedule",
            &appointment,
            "--client",
            &client,
            "--role",
            "cliente",
            "--actor",
            "00000000-0000-0000-0000-00000000beef",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not permitted"));

    // The owner succeeds and the agenda shows the marker status.
    agenda_cmd(&dir)
        .args([
            "reschedule",
            &appointment,
            "--client",
            &client,
            "--role",
            "cliente",
            "--actor",
            &client,
        ])
        .assert()
        .success();

    agenda_cmd(&dir)
        .args(["agenda", "--status", "reagendamento_solicitado"])
        .assert()
        .success()
        .stdout(predicate::str::contains(&appointment));
}
