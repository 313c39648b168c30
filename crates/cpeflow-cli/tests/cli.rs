//! End-to-end tests for the cpeflow binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const REGISTRY: &str = "\
CLIENTE|RUC|COMPROBANTE|PROYECTO
ACME PERU SA|20123456789|F001-038941|PRJ001
ACME PERU SA|20123456789|F001-038942|PRJ001
BETA EIRL|20987654321|F002-000123|PRJ002
";

const INVOICE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Invoice xmlns:cbc="urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2"
         xmlns:cac="urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2">
  <cbc:ID>F001-38941</cbc:ID>
  <cbc:IssueDate>2025-03-14</cbc:IssueDate>
  <cac:AccountingSupplierParty>
    <cac:Party>
      <cac:PartyIdentification><cbc:ID>20555555551</cbc:ID></cac:PartyIdentification>
      <cac:PartyLegalEntity><cbc:RegistrationName>SERVICIOS NORTE SAC</cbc:RegistrationName></cac:PartyLegalEntity>
    </cac:Party>
  </cac:AccountingSupplierParty>
  <cac:AccountingCustomerParty>
    <cac:Party>
      <cac:PartyIdentification><cbc:ID>20123456789</cbc:ID></cac:PartyIdentification>
      <cac:PartyLegalEntity><cbc:RegistrationName>ACME PERU SA</cbc:RegistrationName></cac:PartyLegalEntity>
    </cac:Party>
  </cac:AccountingCustomerParty>
  <cac:InvoiceLine>
    <cac:Item><cbc:Description>SERVICIO DE MANTENIMIENTO</cbc:Description></cac:Item>
  </cac:InvoiceLine>
</Invoice>"#;

fn cpeflow() -> Command {
    Command::cargo_bin("cpeflow").unwrap()
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn resolve_finds_project_for_unpadded_identifier() {
    let dir = tempfile::tempdir().unwrap();
    let registry = dir.path().join("tabla_1.csv");
    write(&registry, REGISTRY);

    cpeflow()
        .args(["resolve", "F001-38941", "--registry"])
        .arg(&registry)
        .assert()
        .success()
        .stdout(predicate::str::contains("PRJ001"))
        .stdout(predicate::str::contains("exact"));
}

#[test]
fn resolve_reports_soft_miss_without_failing() {
    let dir = tempfile::tempdir().unwrap();
    let registry = dir.path().join("tabla_1.csv");
    write(&registry, REGISTRY);

    cpeflow()
        .args(["resolve", "F009-999999", "--registry"])
        .arg(&registry)
        .assert()
        .success()
        .stdout(predicate::str::contains("No registry entry"));
}

#[test]
fn resolve_fails_on_missing_registry() {
    cpeflow()
        .args(["resolve", "F001-38941", "--registry", "/nonexistent/tabla_1.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn organize_files_by_category() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("R-20555555551-01-F001-038941.xml"), "<r/>");
    write(&dir.path().join("20555555551-01-F001-038941.xml"), "<i/>");
    write(&dir.path().join("20555555551-01-F001-038941.pdf"), "pdf");
    write(&dir.path().join("adjunto.docx"), "doc");
    write(&dir.path().join("tabla_1.csv"), REGISTRY);

    cpeflow()
        .arg("organize")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 CDR, 1 PDF, 1 XML, 1 other"));

    assert!(dir
        .path()
        .join("comprobantes_CDR/R-20555555551-01-F001-038941.xml")
        .is_file());
    assert!(dir
        .path()
        .join("comprobantes_XML/20555555551-01-F001-038941.xml")
        .is_file());
    assert!(dir
        .path()
        .join("comprobantes_PDF/20555555551-01-F001-038941.pdf")
        .is_file());
    assert!(dir.path().join("comprobantes_OTROS/adjunto.docx").is_file());
    // The registry stays put.
    assert!(dir.path().join("tabla_1.csv").is_file());
}

#[test]
fn organize_dry_run_moves_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("20555555551-01-F001-038941.pdf"), "pdf");

    cpeflow()
        .args(["organize", "--dry-run"])
        .arg(dir.path())
        .assert()
        .success();

    assert!(dir.path().join("20555555551-01-F001-038941.pdf").is_file());
    assert!(!dir.path().join("comprobantes_PDF").exists());
}

#[test]
fn extract_writes_records_table() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("tabla_1.csv"), REGISTRY);
    write(
        &dir.path().join("comprobantes_XML/20555555551-01-F001-038941.xml"),
        INVOICE_XML,
    );

    cpeflow()
        .arg("extract")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Extracted 1 invoices"));

    let records = fs::read_to_string(dir.path().join("3.file_table_xml.csv")).unwrap();
    assert!(records.contains("N° de Comprobante"));
    assert!(records.contains("F001-38941"));
    assert!(records.contains("PRJ001"));
    assert!(records.contains("SIN PROCESAR"));
}

#[test]
fn extract_continues_past_malformed_document() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("tabla_1.csv"), REGISTRY);
    write(
        &dir.path().join("comprobantes_XML/20555555551-01-F001-038941.xml"),
        INVOICE_XML,
    );
    write(
        &dir.path().join("comprobantes_XML/20555555551-01-F001-038999.xml"),
        "<Invoice><cbc:ID>truncated",
    );

    cpeflow()
        .arg("extract")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Extracted 1 invoices"))
        .stdout(predicate::str::contains("1 failed"));

    let records = fs::read_to_string(dir.path().join("3.file_table_xml.csv")).unwrap();
    assert!(records.contains("F001-38941"));
}

#[test]
fn extract_fail_fast_aborts_on_malformed_document() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("tabla_1.csv"), REGISTRY);
    write(
        &dir.path().join("comprobantes_XML/20555555551-01-F001-038999.xml"),
        "<Invoice><cbc:ID>truncated",
    );

    cpeflow()
        .args(["extract", "--fail-fast"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Extraction failed"));
}

#[test]
fn extract_fails_without_xml_folder() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("tabla_1.csv"), REGISTRY);

    cpeflow()
        .arg("extract")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No XML files"));
}

#[test]
fn place_builds_organized_tree_and_fills_master_column() {
    let dir = tempfile::tempdir().unwrap();

    // Registry keyed by the 01- double-hyphen encoding.
    write(
        &dir.path().join("tabla_1.csv"),
        "CLIENTE|RUC|COMPROBANTE|PROYECTO\n\
         ACME PERU SA|20123456789|01-F001--0038941|PRJ001\n\
         ACME PERU SA|20123456789|01-F001--0038942|PRJ001\n",
    );
    write(
        &dir.path().join("maestra.csv"),
        "Cliente,RUC Cliente,Sociedad,RUC Sociedad,Proyecto\n\
         ACME PERU SA,20123456789,SERVICIOS NORTE SAC,20555555551,PRJ001\n",
    );
    // Records table in the extract output layout.
    write(
        &dir.path().join("3.file_table_xml.csv"),
        "Cliente,RUC,Proyecto,Empresa,RUC2,N° de Comprobante,Fecha de Envío,Divisa,Tipo de Impuesto,Condición de pago,Valor Venta,IGV (18%),TOTAL,OC-OS,Número de Recepción (NR-CR),Descripción (Primera Fila),ENVIAR CORREO,ESTADO,EN MAESTRA\n\
         ACME PERU SA,20123456789,PRJ001,SERVICIOS NORTE SAC,20555555551,F001-38941,2025-03-14,,,,,,,,,,NO,SIN PROCESAR,\n",
    );
    write(
        &dir.path().join("comprobantes_PDF/20555555551-01-F001-38941.pdf"),
        "pdf",
    );
    write(
        &dir.path().join("comprobantes_XML/20555555551-01-F001-38941.xml"),
        INVOICE_XML,
    );

    cpeflow()
        .arg("place")
        .arg(dir.path())
        .arg("--master")
        .arg(dir.path().join("maestra.csv"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Placed 1 of 1"));

    let invoice_dir = dir
        .path()
        .join("Organizado/ACME PERU SA/SERVICIOS NORTE SAC/PRJ001/F001-38941");
    assert!(invoice_dir.join("20555555551-01-F001-38941.pdf").is_file());
    assert!(invoice_dir.join("20555555551-01-F001-38941.xml").is_file());

    let records = fs::read_to_string(dir.path().join("3.file_table_xml.csv")).unwrap();
    assert!(records.contains("OK"));

    let log = fs::read_to_string(dir.path().join("Organizado/log.csv")).unwrap();
    assert!(log.contains("Completado"));
}

#[test]
fn place_marks_missing_master_project() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir.path().join("tabla_1.csv"),
        "CLIENTE|RUC|COMPROBANTE|PROYECTO\n\
         ACME PERU SA|20123456789|01-F001--0038941|PRJ001\n\
         ACME PERU SA|20123456789|01-F001--0038942|PRJ001\n",
    );
    write(
        &dir.path().join("maestra.csv"),
        "Cliente,RUC Cliente,Sociedad,RUC Sociedad,Proyecto\n\
         OTRO,1,OTRA,2,PRJ999\n",
    );
    write(
        &dir.path().join("3.file_table_xml.csv"),
        "Cliente,RUC,Proyecto,Empresa,RUC2,N° de Comprobante,Fecha de Envío,Divisa,Tipo de Impuesto,Condición de pago,Valor Venta,IGV (18%),TOTAL,OC-OS,Número de Recepción (NR-CR),Descripción (Primera Fila),ENVIAR CORREO,ESTADO,EN MAESTRA\n\
         ACME PERU SA,20123456789,PRJ001,SERVICIOS NORTE SAC,20555555551,F001-38941,2025-03-14,,,,,,,,,,NO,SIN PROCESAR,\n",
    );

    cpeflow()
        .arg("place")
        .arg(dir.path())
        .arg("--master")
        .arg(dir.path().join("maestra.csv"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Placed 0 of 1"));

    let log = fs::read_to_string(dir.path().join("Organizado/log.csv")).unwrap();
    assert!(log.contains("No encontrado en maestra"));
}

#[test]
fn config_path_reports_location() {
    cpeflow()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file"));
}
