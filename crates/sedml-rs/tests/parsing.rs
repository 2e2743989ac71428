// crates/sedml-rs/tests/parsing.rs

use sedml_rs::{
    AbstractTask, ErrorCode, IdCollector, Model, OperationStatus, Range, ReaderConfig, SedBase,
    SedDocument, SedVisitor, Simulation, SurfaceType, Task, TypeCode, TypeFilter, Variable,
    read_sedml_from_file, read_sedml_from_str, read_sedml_with_config, write_sedml_to_string,
};
use std::fs;
use std::path::PathBuf;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn test_file_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push(name);
    path
}

/// Helper function to load a test file from the `tests/data/` directory.
fn load_test_file(name: &str) -> String {
    let path = test_file_path(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read test file {:?}: {}", path, e))
}

fn oscillator() -> SedDocument {
    let doc = read_sedml_from_str(&load_test_file("oscillator_l1v3.sedml"));
    assert!(
        doc.error_log().is_empty(),
        "Unexpected diagnostics: {:?}",
        doc.error_log()
    );
    doc
}

#[test]
fn test_read_full_document() {
    init_logger();
    let doc = oscillator();

    assert_eq!((doc.level(), doc.version()), (1, 3));
    assert_eq!(doc.num_models(), 1);
    assert_eq!(doc.num_simulations(), 3);
    assert_eq!(doc.num_tasks(), 2);
    assert_eq!(doc.num_data_generators(), 2);
    assert_eq!(doc.num_outputs(), 3);

    let model = doc.get_model_by_id("m1").expect("model m1");
    assert_eq!(model.name(), Some("Oscillator"));
    assert_eq!(model.source(), Some("oscillator.xml"));
    assert_eq!(model.num_changes(), 2);
    assert!(model.notes().unwrap().contains("relaxation oscillator"));

    let Some(Simulation::UniformTimeCourse(sim)) = doc.get_simulation_by_id("sim1") else {
        panic!("sim1 should be a uniformTimeCourse");
    };
    assert_eq!(sim.output_end_time(), Some(100.0));
    assert_eq!(sim.number_of_points(), Some(1000));
    let algorithm = sim.algorithm().expect("algorithm");
    assert_eq!(algorithm.kisao_id(), Some("KISAO:0000019"));
    assert_eq!(algorithm.parameters().len(), 1);
    assert_eq!(algorithm.parameters().get(0).unwrap().value(), Some("1e-7"));

    let Some(Simulation::OneStep(step)) = doc.get_simulation_by_id("sim2") else {
        panic!("sim2 should be a oneStep");
    };
    assert_eq!(step.step(), Some(0.1));

    let Some(AbstractTask::Repeated(repeated)) = doc.get_task_by_id("rt1") else {
        panic!("rt1 should be a repeatedTask");
    };
    assert_eq!(repeated.reset_model(), Some(true));
    assert_eq!(repeated.concatenate(), Some(false));
    assert_eq!(repeated.ranges().len(), 2);
    let Some(Range::Vector(vector)) = repeated.ranges().get_by_id("r1") else {
        panic!("r1 should be a vectorRange");
    };
    assert_eq!(vector.values(), &[1.0, 2.5, 5.0]);
    assert_eq!(repeated.sub_tasks().get(0).unwrap().order(), Some(1));
    assert!(repeated.changes().get(0).unwrap().math().unwrap().contains("<ci>r1</ci>"));

    let dg_x = doc.get_data_generator_by_id("dg_x").unwrap();
    assert_eq!(dg_x.num_variables(), 1);
    assert_eq!(dg_x.parameters().get(0).unwrap().value(), Some(2.0));

    let surface = doc
        .get_element_by_sid("s1")
        .and_then(|node| node.downcast_ref::<sedml_rs::Surface>())
        .expect("surface s1");
    assert_eq!(surface.surface_type(), Some(SurfaceType::SurfaceMesh));
    assert_eq!(surface.log_z(), Some(true));
}

#[test]
fn test_back_references_after_read() {
    let doc = oscillator();
    let task = doc.get_element_by_sid("t1").expect("task t1");
    assert_eq!(task.base().document(), Some(doc.document_id()));

    let list = doc.parent_of(task).expect("listOfTasks");
    assert_eq!(list.element_name(), "listOfTasks");
    assert_eq!(
        doc.parent_of(list).map(|node| node.type_code()),
        Some(TypeCode::Document)
    );
    assert!(task.annotation().unwrap().contains("urn:example:provenance"));
}

#[test]
fn test_round_trip_is_stable() {
    init_logger();
    let doc = oscillator();
    let first = write_sedml_to_string(&doc).expect("first write");

    let reread = read_sedml_from_str(&first);
    assert!(reread.error_log().is_empty(), "{:?}", reread.error_log());
    assert_eq!(reread, doc);

    let second = write_sedml_to_string(&reread).expect("second write");
    assert_eq!(first, second);
    assert!(first.contains("xmlns:sbml=\"http://www.sbml.org/sbml/level3/version1/core\""));
    assert!(first.contains("concatenate=\"false\""));
}

#[test]
fn test_read_from_file() {
    let doc = read_sedml_from_file(test_file_path("oscillator_l1v3.sedml")).expect("readable file");
    assert_eq!(doc.num_outputs(), 3);

    let missing = read_sedml_from_file(test_file_path("does_not_exist.sedml"));
    assert!(matches!(missing, Err(sedml_rs::SedmlError::Io(_))));
}

/// Model `m1`, task `t1` referencing it, then a rename of the reference.
#[test]
fn test_rename_model_reference_survives_reparse() {
    init_logger();
    let mut doc = SedDocument::new(1, 3).unwrap();
    let model = doc.create_model();
    let _ = model.set_id("m1");
    let _ = model.set_source("model.xml");
    let sim = doc.create_steady_state();
    let _ = sim.set_id("sim1");
    let _ = sim.create_algorithm().set_kisao_id("KISAO:0000407");
    let task = doc.create_task();
    let _ = task.set_id("t1");
    let _ = task.set_model_reference("m1");
    let _ = task.set_simulation_reference("sim1");

    assert_eq!(doc.rename_everywhere("m1", "m2"), 1);

    let check = |doc: &SedDocument| {
        let task = doc
            .get_element_by_sid("t1")
            .and_then(|node| node.downcast_ref::<Task>())
            .expect("task t1");
        assert_eq!(task.model_reference(), Some("m2"));
        assert_eq!(doc.get_model(0).unwrap().id(), Some("m1"));
    };
    check(&doc);

    let xml = write_sedml_to_string(&doc).unwrap();
    let reparsed = read_sedml_from_str(&xml);
    assert!(reparsed.error_log().is_empty());
    assert_eq!((reparsed.level(), reparsed.version()), (1, 3));
    check(&reparsed);
}

#[test]
fn test_rename_reaches_every_reference_kind() {
    let mut doc = oscillator();
    // subTask@task and both variable@taskReference.
    assert_eq!(doc.rename_everywhere("t1", "base_task"), 3);
    // repeatedTask@range, setValue@range and the <ci> in its math.
    assert_eq!(doc.rename_everywhere("r1", "scan"), 3);
    assert!(doc.get_element_by_sid("t1").is_some());
    assert_eq!(doc.rename_everywhere("nothing", "else"), 0);
}

#[test]
fn test_check_consistency_on_dangling_references() {
    init_logger();
    let config = ReaderConfig {
        check_consistency: true,
        ..ReaderConfig::default()
    };
    let doc = read_sedml_with_config(&load_test_file("dangling_references.sedml"), &config);
    let log = doc.error_log();

    assert!(log.contains(ErrorCode::SedmlDuplicateComponentId));
    assert!(log.contains(ErrorCode::SedmlTaskModelReferenceMustBeModel));
    assert!(log.contains(ErrorCode::SedmlTaskSimulationReferenceMustBeSimulation));
    assert!(log.contains(ErrorCode::SedmlDataSetDataReferenceMustBeDataGenerator));
    assert_eq!(log.num_errors(), 4, "{:?}", log);

    let duplicate = log
        .iter()
        .find(|e| e.error_id == ErrorCode::SedmlDuplicateComponentId)
        .unwrap();
    assert_eq!(duplicate.line, 5);
}

#[test]
fn test_consistent_document_has_no_findings() {
    let mut doc = oscillator();
    assert_eq!(doc.check_consistency(), 0);
    assert!(doc.error_log().is_empty());
}

#[test]
fn test_filters_and_visitor() {
    let doc = oscillator();

    let simulations = doc.get_all_elements(Some(&TypeFilter(TypeCode::Simulation)));
    let ids: Vec<_> = simulations.iter().filter_map(|n| n.id()).collect();
    assert_eq!(ids, ["sim1", "sim2", "sim3"]);

    let variables = doc.get_all_elements(Some(&TypeFilter(TypeCode::Variable)));
    assert_eq!(variables.len(), 2);
    assert!(variables.iter().all(|n| n.is::<Variable>()));

    let named = |node: &dyn SedBase| node.name().is_some();
    let named_nodes = doc.get_all_elements(Some(&named));
    assert_eq!(named_nodes.len(), 4);

    let mut collector = IdCollector::default();
    doc.accept(&mut collector);
    assert_eq!(collector.ids.first().map(String::as_str), Some("m1"));
    assert!(collector.ids.contains(&"ds_x".to_string()));

    #[derive(Default)]
    struct ListCounter {
        lists: Vec<TypeCode>,
        documents: usize,
    }
    impl SedVisitor for ListCounter {
        fn visit_document(&mut self, _doc: &SedDocument) {
            self.documents += 1;
        }
        fn visit_list(&mut self, _list: &dyn SedBase, item_type: TypeCode) {
            self.lists.push(item_type);
        }
    }
    let mut counter = ListCounter::default();
    doc.accept(&mut counter);
    assert_eq!(counter.documents, 1);
    assert_eq!(
        &counter.lists[..5],
        &[TypeCode::Model, TypeCode::Change, TypeCode::Simulation, TypeCode::AlgorithmParameter, TypeCode::AlgorithmParameter]
    );
}

#[test]
fn test_add_copy_and_transfer_ownership() {
    let mut doc = oscillator();
    let mut copy = doc.get_model(0).unwrap().clone();
    assert_eq!(copy.base().parent(), None);
    assert_eq!(doc.add_model(&copy), OperationStatus::DuplicateObjectId);

    let _ = copy.set_id("m_copy");
    assert_eq!(doc.add_model(&copy), OperationStatus::Success);
    assert_eq!(doc.num_models(), 2);

    let removed: Model = doc.remove_model_by_id("m_copy").expect("removed model");
    assert_eq!(removed.base().parent(), None);
    assert_eq!(removed.base().document(), None);
    assert_eq!(doc.num_models(), 1);

    let mut other = SedDocument::new(1, 3).unwrap();
    let _ = other.add_namespace("sbml", "http://www.sbml.org/sbml/level3/version1/core");
    assert_eq!(other.add_model(&removed), OperationStatus::Success);
    assert_eq!(
        other.get_model(0).unwrap().base().document(),
        Some(other.document_id())
    );
}
