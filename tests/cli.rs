use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

const BINARY: &str = "screed";
type TestResult = Result<(), Box<dyn std::error::Error>>;

#[test]
fn index_of_missing_file_fails() -> TestResult {
    let mut cmd = Command::cargo_bin(BINARY)?;

    cmd.arg("index").arg("file_which_does_not_exist.fastq");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    Ok(())
}

#[test]
fn info_of_missing_database_fails() -> TestResult {
    let mut cmd = Command::cargo_bin(BINARY)?;

    cmd.arg("info").arg("no_such_db");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no such file"));

    Ok(())
}

#[test]
fn index_then_dump() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let input = temp.child("reads.fa");
    input.write_str(">r1 first\nACGT\n>r2 second\nTTTT\n")?;

    Command::cargo_bin(BINARY)?
        .arg("index")
        .arg(input.path())
        .assert()
        .success();

    let db = temp.child("reads.fa_screed");
    db.assert(predicate::path::exists());

    let output = Command::cargo_bin(BINARY)?
        .arg("to-fasta")
        .arg(db.path())
        .output()?;
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout)?,
        ">r1 first\nACGT\n>r2 second\nTTTT\n"
    );

    Ok(())
}

#[test]
fn dump_fastq_synthesises_quality() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let input = temp.child("reads.fa");
    input.write_str(">r1\nACGT\n")?;

    Command::cargo_bin(BINARY)?
        .arg("index")
        .arg(input.path())
        .assert()
        .success();

    Command::cargo_bin(BINARY)?
        .arg("to-fastq")
        .arg(temp.child("reads.fa_screed").path())
        .assert()
        .success()
        .stdout(predicate::eq("@r1\nACGT\n+\n\"\"\"\"\n"));

    Ok(())
}

#[test]
fn info_reports_record_count() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let input = temp.child("reads.fq");
    input.write_str("@r1\nACGT\n+\n!!!!\n@r2\nTT\n+\n!!\n")?;

    Command::cargo_bin(BINARY)?
        .arg("index")
        .arg(input.path())
        .assert()
        .success();

    Command::cargo_bin(BINARY)?
        .arg("info")
        .arg(temp.child("reads.fq_screed").path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"records\": 2"))
        .stdout(predicate::str::contains("\"format\": \"fastq\""));

    Ok(())
}

#[test]
fn dump_of_non_database_fails() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let not_a_db = temp.child("reads.fa");
    not_a_db.write_str(">r1\nACGT\n")?;

    Command::cargo_bin(BINARY)?
        .arg("to-fasta")
        .arg(not_a_db.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("wrong format"));

    Ok(())
}
