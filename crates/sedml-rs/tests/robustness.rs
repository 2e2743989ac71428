//! Integration tests focused on error handling and edge cases.
//!
//! These tests make sure the reader reports malformed XML, unknown content,
//! invalid attribute values and missing required attributes through the
//! document's error log, without panicking and without losing the parts of
//! the document that could be read.

use sedml_rs::{
    Category, ErrorCode, ErrorLog, OperationStatus, ReaderConfig, SedBase, SedDocument, Severity,
    Simulation, Surface, WriterConfig, read_sedml_from_file, read_sedml_from_str,
    read_sedml_with_config, write_sedml_to_string,
};

const L1V4_OPEN: &str =
    r#"<sedML xmlns="http://sed-ml.org/sed-ml/level1/version4" level="1" version="4">"#;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Wraps `body` in an L1V4 `<sedML>` root.
fn document(body: &str) -> String {
    format!("{}\n{}\n</sedML>", L1V4_OPEN, body)
}

fn codes(log: &ErrorLog) -> Vec<ErrorCode> {
    log.iter().map(|e| e.error_id).collect()
}

#[test]
fn test_surface_missing_z_data_reference() {
    init_logger();
    let xml = document(
        r#"<listOfOutputs>
  <plot3D id="p3d">
    <listOfSurfaces>
      <surface id="s1" xDataReference="dgx" yDataReference="dgy"/>
    </listOfSurfaces>
  </plot3D>
</listOfOutputs>"#,
    );
    let doc = read_sedml_from_str(&xml);

    let surface = doc
        .get_element_by_sid("s1")
        .and_then(|node| node.downcast_ref::<Surface>())
        .expect("surface s1");
    assert!(!surface.has_required_attributes());
    assert_eq!(surface.missing_required_attributes(), vec!["zDataReference"]);

    let log = doc.error_log();
    assert_eq!(log.num_errors(), 1, "{:?}", log);
    let error = log.get(0).unwrap();
    assert_eq!(error.error_id, ErrorCode::SedmlSurfaceAllowedAttributes);
    assert!(error.message.contains("zDataReference"));
    assert_eq!(error.line, 5);
}

#[test]
fn test_malformed_xml_keeps_partial_document() {
    init_logger();
    let xml = format!(
        "{}\n<listOfModels>\n<model id=\"m1\" source=\"a.xml\"/>\n<model id=\"m2\" source=\"b.xml\">\n</listOfModels>\n</sedML>",
        L1V4_OPEN
    );
    let doc = read_sedml_from_str(&xml);

    assert_eq!(doc.num_models(), 2);
    assert_eq!(doc.get_model(0).unwrap().source(), Some("a.xml"));
    let xml_errors: Vec<_> = doc
        .error_log()
        .iter()
        .filter(|e| e.category == Category::Xml)
        .collect();
    assert_eq!(xml_errors.len(), 1);
    assert_eq!(xml_errors[0].severity, Severity::Fatal);
    assert_eq!(xml_errors[0].line, 5);
    assert_eq!(doc.error_log().num_failures_with_severity(Severity::Fatal), 1);
}

#[test]
fn test_unknown_content_is_reported_and_skipped() {
    init_logger();
    let xml = document(
        r#"<listOfModels>
  <model id="m1" source="a.xml" color="red" xsi:type="x" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <widget><model id="hidden" source="h.xml"/></widget>
  </model>
</listOfModels>"#,
    );
    let doc = read_sedml_from_str(&xml);
    let log = doc.error_log();

    assert_eq!(
        codes(log),
        vec![ErrorCode::SedmlModelAllowedAttributes, ErrorCode::SedUnrecognizedElement]
    );
    assert!(log.get(0).unwrap().message.contains("color"));
    assert!(doc.get_element_by_sid("hidden").is_none());
    assert_eq!(doc.num_models(), 1);
}

#[test]
fn test_invalid_attribute_values() {
    let xml = document(
        r#"<listOfSimulations>
  <uniformTimeCourse id="sim1" initialTime="zero" outputStartTime="0" outputEndTime="10" numberOfPoints="ten">
    <algorithm kisaoID="KISAO:0000019"/>
  </uniformTimeCourse>
</listOfSimulations>
<listOfOutputs>
  <plot3D id="p3d">
    <listOfSurfaces>
      <surface xDataReference="a" yDataReference="b" zDataReference="c" logZ="maybe" type="sphere"/>
    </listOfSurfaces>
  </plot3D>
</listOfOutputs>"#,
    );
    let doc = read_sedml_from_str(&xml);
    let log = doc.error_log();

    assert!(log.contains(ErrorCode::SedmlUniformTimeCourseInitialTimeMustBeDouble));
    assert!(log.contains(ErrorCode::SedmlUniformTimeCourseNumberOfPointsMustBeInteger));
    assert!(log.contains(ErrorCode::SedmlSurfaceLogZMustBeBoolean));
    assert!(log.contains(ErrorCode::SedmlSurfaceTypeMustBeSurfaceTypeEnum));
    assert_eq!(log.num_errors(), 4, "{:?}", log);

    let Some(Simulation::UniformTimeCourse(sim)) = doc.get_simulation(0) else {
        panic!("expected a uniformTimeCourse");
    };
    assert_eq!(sim.initial_time(), None);
    assert_eq!(sim.output_end_time(), Some(10.0));
    assert_eq!(sim.number_of_points(), None);
    assert!(!sim.has_required_attributes());

    let surface = doc
        .get_all_elements(None)
        .into_iter()
        .find_map(|node| node.downcast_ref::<Surface>())
        .unwrap();
    assert_eq!(surface.log_z(), None);
    assert_eq!(surface.surface_type(), None);
}

#[test]
fn test_bad_ids_are_reported_unless_disabled() {
    let xml = document(
        r#"<listOfModels>
  <model id="1model" metaid="9meta" source="a.xml"/>
</listOfModels>"#,
    );
    let doc = read_sedml_from_str(&xml);
    assert_eq!(
        codes(doc.error_log()),
        vec![ErrorCode::SedmlIdSyntaxRule, ErrorCode::SedInvalidMetaidSyntax]
    );
    assert_eq!(doc.get_model(0).unwrap().id(), Some("1model"));

    let relaxed = ReaderConfig {
        validate_ids: false,
        ..ReaderConfig::default()
    };
    let doc = read_sedml_with_config(&xml, &relaxed);
    assert!(doc.error_log().is_empty());
}

#[test]
fn test_repeated_list_and_notes() {
    let xml = document(
        r#"<notes><p xmlns="http://www.w3.org/1999/xhtml">one</p></notes>
<notes><p xmlns="http://www.w3.org/1999/xhtml">two</p></notes>
<listOfModels><model id="m1" source="a.xml"/></listOfModels>
<listOfModels><model id="m2" source="b.xml"/></listOfModels>"#,
    );
    let doc = read_sedml_from_str(&xml);
    let log = doc.error_log();
    assert_eq!(
        codes(log),
        vec![
            ErrorCode::SedmlDocumentAllowedElements,
            ErrorCode::SedmlDocumentAllowedElements
        ]
    );
    assert!(doc.notes().unwrap().contains("two"));
    assert_eq!(doc.num_models(), 2);
}

#[test]
fn test_unsupported_level_version() {
    assert!(matches!(
        SedDocument::new(1, 9),
        Err(sedml_rs::SedmlError::InvalidLevelVersion { level: 1, version: 9 })
    ));

    let doc = read_sedml_from_str(
        r#"<sedML xmlns="http://sed-ml.org/sed-ml/level1/version4" level="one" version="4"/>"#,
    );
    assert_eq!((doc.level(), doc.version()), (1, 4));
    assert_eq!(
        codes(doc.error_log()),
        vec![ErrorCode::SedmlDocumentLevelMustBeNonNegativeInteger]
    );
}

#[test]
fn test_not_utf8_file() {
    let mut path = std::env::temp_dir();
    path.push(format!("sedml-rs-not-utf8-{}.sedml", std::process::id()));
    std::fs::write(&path, b"<sedML level=\"1\" version=\"4\">\xff\xfe</sedML>").unwrap();

    let doc = read_sedml_from_file(&path).expect("the file itself is readable");
    let _ = std::fs::remove_file(&path);

    assert_eq!(codes(doc.error_log()), vec![ErrorCode::SedNotUtf8]);
    assert_eq!(doc.num_models(), 0);
}

#[test]
fn test_idempotent_unset_and_status_codes() {
    let mut doc = SedDocument::default();
    let model = doc.create_model();
    assert_eq!(model.set_id("bad id"), OperationStatus::InvalidAttributeValue);
    assert_eq!(model.set_id("m1"), OperationStatus::Success);
    assert_eq!(model.set_attribute("source", "a.xml"), OperationStatus::Success);
    assert_eq!(model.set_attribute("colour", "red"), OperationStatus::UnexpectedAttribute);

    for _ in 0..2 {
        assert_eq!(model.unset_attribute("source"), OperationStatus::Success);
        assert!(!model.is_set_attribute("source"));
        assert_eq!(model.unset_name(), OperationStatus::Success);
    }
    assert_eq!(model.get_attribute("source"), None);
    assert!(!model.has_required_attributes());

    let copy = doc.get_model(0).unwrap().clone();
    assert_eq!(doc.add_model(&copy), OperationStatus::InvalidObject);
    assert_eq!(OperationStatus::InvalidObject.code(), -5);
    assert_eq!(OperationStatus::NamespacesMismatch.code(), -10);
}

#[test]
fn test_rejected_generic_set_keeps_value() {
    let mut doc = SedDocument::default();
    let sim = doc.create_uniform_time_course();
    let _ = sim.set_number_of_points(10);
    let _ = sim.set_attribute("outputEndTime", "5");

    assert_eq!(
        sim.set_attribute("numberOfPoints", "ten"),
        OperationStatus::InvalidAttributeValue
    );
    assert_eq!(
        sim.set_attribute("outputEndTime", "later"),
        OperationStatus::InvalidAttributeValue
    );
    assert_eq!(sim.number_of_points(), Some(10));
    assert_eq!(sim.output_end_time(), Some(5.0));
    assert_eq!(sim.get_attribute("numberOfPoints").as_deref(), Some("10"));
}

#[test]
fn test_clone_independence() {
    let xml = document(
        r#"<listOfDataGenerators>
  <dataGenerator id="dg">
    <listOfParameters><parameter id="p" value="1"/></listOfParameters>
    <math xmlns="http://www.w3.org/1998/Math/MathML"><ci>p</ci></math>
  </dataGenerator>
</listOfDataGenerators>"#,
    );
    let original = read_sedml_from_str(&xml);
    let mut copy = original.clone();
    assert_eq!(copy, original);

    let generator = copy.get_data_generator_mut(0).unwrap();
    let _ = generator.create_parameter().set_id("q");
    assert_eq!(copy.rename_everywhere("p", "k"), 1);

    let untouched = original.get_data_generator(0).unwrap();
    assert_eq!(untouched.num_parameters(), 1);
    assert!(untouched.math().unwrap().contains("<ci>p</ci>"));
    assert_ne!(copy, original);
    assert_eq!(
        untouched.base().document(),
        Some(original.document_id())
    );
}

#[test]
fn test_error_log_exports_as_json() {
    let doc = read_sedml_from_str(&document(
        r#"<listOfModels><model source="a.xml"/></listOfModels>"#,
    ));
    let log = doc.error_log();
    assert_eq!(codes(log), vec![ErrorCode::SedmlModelAllowedAttributes]);

    let json = serde_json::to_string(log).expect("serializable log");
    assert!(json.contains("\"code\":20303"));
    let back: ErrorLog = serde_json::from_str(&json).expect("deserializable log");
    assert_eq!(&back, log);

    let mut printed = Vec::new();
    log.print_errors(&mut printed).unwrap();
    assert!(String::from_utf8(printed).unwrap().contains("20303"));
}

#[test]
fn test_configs_round_trip_through_json() {
    let reader: ReaderConfig = serde_json::from_str(r#"{"check_consistency": true}"#).unwrap();
    assert!(reader.validate_ids);
    assert!(reader.check_consistency);

    let writer = WriterConfig {
        indent: 0,
        xml_declaration: false,
    };
    let json = serde_json::to_string(&writer).unwrap();
    assert_eq!(serde_json::from_str::<WriterConfig>(&json).unwrap(), writer);
}

#[test]
fn test_writing_incomplete_document_succeeds() {
    let mut doc = SedDocument::default();
    let _ = doc.create_task().set_id("t1");
    let xml = write_sedml_to_string(&doc).expect("writes even when invalid");
    assert!(xml.contains("<task id=\"t1\"/>"));
}
