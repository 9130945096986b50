//! End-to-end generation scenarios
//!
//! Each test builds a package model, runs one strategy and checks the
//! planned files and their contents.

use implgen::model::{Interface, Method, Package, Parameter, TypeRef};
use implgen::{generate, parse_go_package, Error, GenerateOptions, RenderError, Strategy};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

const MODEL: &str = "github.com/acme/shop/model";

fn package(name: &str, methods: Vec<Method>) -> Package {
    Package {
        name: "in".into(),
        interfaces: vec![Interface {
            name: name.into(),
            methods,
        }],
        imports: vec![],
    }
}

fn opts() -> GenerateOptions {
    GenerateOptions {
        destination: PathBuf::from("out"),
        ..Default::default()
    }
}

fn paths(files: &[implgen::OutputFile]) -> Vec<PathBuf> {
    files.iter().map(|f| f.path.clone()).collect()
}

// ============================================================================
// Scenario A: basic stub, multi-file layout
// ============================================================================

#[test]
fn scenario_a_basic_greeter() {
    let greet = Method {
        name: "Greet".into(),
        inputs: vec![Parameter::new("ctx", TypeRef::context())],
        outputs: vec![Parameter::unnamed(TypeRef::bare("error"))],
        ..Default::default()
    };
    let files = generate(&package("Greeter", vec![greet]), Strategy::Basic, &opts()).unwrap();

    assert_eq!(
        paths(&files),
        vec![
            PathBuf::from("out/greeter/implementation.go"),
            PathBuf::from("out/greeter/greet.go"),
        ]
    );

    let greet = files[1].text();
    assert!(greet.contains("func (i *Implementation) Greet(ctx context.Context) error {"));
    assert!(greet.contains("\tpanic(\"implement me\")\n"));
    assert!(!greet.contains("return"));
}

// ============================================================================
// Scenario B: repository get with a directive
// ============================================================================

#[test]
fn scenario_b_repository_get() {
    let get = Method {
        name: "Get".into(),
        inputs: vec![
            Parameter::new("ctx", TypeRef::context()),
            Parameter::new("id", TypeRef::qualified(MODEL, "OrderID")),
        ],
        outputs: vec![
            Parameter::unnamed(TypeRef::qualified(MODEL, "Order")),
            Parameter::unnamed(TypeRef::bare("error")),
        ],
        comment: "sqlx: GetContext".into(),
        ..Default::default()
    };
    let files = generate(&package("OrderRepo", vec![get]), Strategy::Repository, &opts()).unwrap();

    assert_eq!(
        paths(&files),
        vec![
            PathBuf::from("out/order-repo/implementation.go"),
            PathBuf::from("out/order-repo/get.go"),
            PathBuf::from("out/order-repo/sql/get.sql"),
            PathBuf::from("out/order-repo/model/order.go"),
            PathBuf::from("out/order-repo/sql/sql.go"),
        ]
    );

    let body = files[1].text();
    assert!(body.contains(
        "func (i Implementation) Get(ctx context.Context, id model.OrderID) (model.Order, error) {"
    ));
    assert!(body.contains("\tvar item []byte\n"));
    assert!(body.contains(
        "\terr = i.ctxGetter.DefaultTrOrDB(ctx, i.db).GetContext(ctx, &item, sql.Get)\n"
    ));
    assert!(body.contains("\tif err != nil {\n\t\treturn model.Order{}, err\n\t}\n"));
    // the error position only ever carries the observed error
    assert!(!body.contains("model.Order{}, nil"));
}

#[test]
fn scenario_b_string_like_identifier() {
    let create = Method {
        name: "Create".into(),
        inputs: vec![Parameter::new("ctx", TypeRef::context())],
        outputs: vec![
            Parameter::unnamed(TypeRef::qualified(MODEL, "OrderID")),
            Parameter::unnamed(TypeRef::bare("error")),
        ],
        comment: "sqlx: ExecContext".into(),
        ..Default::default()
    };
    let mut opts = opts();
    opts.string_types.insert("model.OrderID".into());

    let files = generate(&package("OrderRepo", vec![create]), Strategy::Repository, &opts).unwrap();
    assert!(files[1].text().contains("\t\treturn \"\", err\n"));
    assert!(!files
        .iter()
        .any(|f| f.path.starts_with("out/order-repo/model")));
}

// ============================================================================
// Scenario C: one placeholder per unknown type
// ============================================================================

#[test]
fn scenario_c_placeholder_emitted_once() {
    let widget_method = |name: &str| Method {
        name: name.into(),
        inputs: vec![Parameter::new("ctx", TypeRef::context())],
        outputs: vec![
            Parameter::unnamed(TypeRef::bare("Widget")),
            Parameter::unnamed(TypeRef::bare("error")),
        ],
        ..Default::default()
    };
    let pkg = package("WidgetRepo", vec![widget_method("First"), widget_method("Second")]);
    let files = generate(&pkg, Strategy::Repository, &opts()).unwrap();

    let placeholders: Vec<_> = files
        .iter()
        .filter(|f| f.path == PathBuf::from("out/widget-repo/model/widget.go"))
        .collect();
    assert_eq!(placeholders.len(), 1);

    let text = placeholders[0].text();
    assert!(text.contains("package model"));
    assert!(text.contains("type Widget struct"));

    for method in ["first", "second"] {
        let file = files
            .iter()
            .find(|f| f.path == PathBuf::from(format!("out/widget-repo/{}.go", method)))
            .unwrap();
        assert!(file.text().contains("return Widget{}, err"));
    }
}

// ============================================================================
// Directive fallback
// ============================================================================

#[test]
fn missing_directive_uses_exec() {
    let ping = Method {
        name: "Ping".into(),
        inputs: vec![Parameter::new("ctx", TypeRef::context())],
        outputs: vec![Parameter::unnamed(TypeRef::bare("error"))],
        comment: "checks the connection".into(),
        ..Default::default()
    };
    let unknown = Method {
        name: "Vacuum".into(),
        comment: "sqlx: QueryRowContext".into(),
        ..ping.clone()
    };
    let files = generate(&package("Store", vec![ping, unknown]), Strategy::Repository, &opts()).unwrap();

    for path in ["out/store/ping.go", "out/store/vacuum.go"] {
        let file = files.iter().find(|f| f.path == PathBuf::from(path)).unwrap();
        let text = file.text();
        assert!(text.contains(".ExecContext(ctx)\n"), "{path}: {text}");
        assert!(!text.contains("SelectContext"));
        assert!(!text.contains("GetContext"));
    }
}

// ============================================================================
// Fatal errors
// ============================================================================

#[test]
fn unrenderable_type_names_interface_and_method() {
    let method = Method {
        name: "Stream".into(),
        inputs: vec![Parameter::new("ch", TypeRef::Unknown("chan int".into()))],
        ..Default::default()
    };
    let err = generate(&package("Feed", vec![method]), Strategy::Basic, &opts()).unwrap_err();

    match err {
        Error::Model {
            interface,
            method,
            source,
        } => {
            assert_eq!(interface, "Feed");
            assert_eq!(method, "Stream");
            assert_eq!(source, RenderError::Unsupported("chan int".into()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn colliding_paths_abort_generation() {
    let method = |name: &str| Method {
        name: name.into(),
        ..Default::default()
    };
    let pkg = package("Repo", vec![method("GetID"), method("GetId")]);
    let err = generate(&pkg, Strategy::Basic, &opts()).unwrap_err();

    match err {
        Error::PathCollision {
            path,
            first,
            second,
        } => {
            assert_eq!(path, PathBuf::from("out/repo/get_id.go"));
            assert_eq!(first, "Repo.GetID");
            assert_eq!(second, "Repo.GetId");
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ============================================================================
// Selection and naming
// ============================================================================

#[test]
fn interface_filter_and_package_override() {
    let pkg = Package {
        name: "in".into(),
        interfaces: vec![
            Interface {
                name: "OrderRepo".into(),
                methods: vec![],
            },
            Interface {
                name: "UserRepo".into(),
                methods: vec![],
            },
        ],
        imports: vec![],
    };
    let opts = GenerateOptions {
        interface_name: Some("UserRepo".into()),
        package_name: Some("AccountStore".into()),
        ..opts()
    };
    let files = generate(&pkg, Strategy::Basic, &opts).unwrap();

    assert_eq!(paths(&files), vec![PathBuf::from("out/account-store/implementation.go")]);
    assert!(files[0].text().starts_with("package account_store\n"));
}

#[test]
fn interfaces_keep_model_order() {
    let iface = |name: &str| Interface {
        name: name.into(),
        methods: vec![],
    };
    let pkg = Package {
        name: "in".into(),
        interfaces: vec![iface("Zeta"), iface("Alpha")],
        imports: vec![],
    };
    let files = generate(&pkg, Strategy::Basic, &opts()).unwrap();
    assert_eq!(
        paths(&files),
        vec![
            PathBuf::from("out/zeta/implementation.go"),
            PathBuf::from("out/alpha/implementation.go"),
        ]
    );
}

// ============================================================================
// Go source through the whole pipeline
// ============================================================================

const ABOBA: &str = r#"package in

import (
	"context"

	"github.com/acme/shop/model"
	othermodel "github.com/acme/billing/model"
)

type CreateRequest struct{}

type Aboba interface {
	Create(ctx context.Context, req CreateRequest) (model.OrderID, error) // sqlx: ExecContext
	Get(ctx context.Context, id model.OrderID) (model.Order, error) // sqlx: GetContext
	Invoices(ctx context.Context, ids ...othermodel.InvoiceID) ([]othermodel.Invoice, error) // sqlx: SelectContext
}
"#;

#[test]
fn go_source_to_repository() {
    let pkg = parse_go_package(ABOBA, Some("github.com/acme/shop/in")).unwrap();
    let opts = GenerateOptions {
        destination: PathBuf::from("internal"),
        module_path: Some("github.com/acme/shop".into()),
        ..Default::default()
    };
    let files = Strategy::Repository.generate(&pkg, &opts).unwrap();

    let invoices = files
        .iter()
        .find(|f| f.path == PathBuf::from("internal/aboba/invoices.go"))
        .unwrap()
        .text()
        .into_owned();

    // the advisory alias of the source file is kept
    assert!(invoices.contains("\tothermodel \"github.com/acme/billing/model\"\n"));
    assert!(invoices.contains(
        "Invoices(ctx context.Context, ids ...othermodel.InvoiceID) ([]othermodel.Invoice, error) {"
    ));
    assert!(invoices.contains("\tsql \"github.com/acme/shop/internal/aboba/sql\"\n"));
    assert!(invoices.contains("SelectContext(ctx, &items, sql.Invoices)"));
    assert!(invoices.contains("\t\treturn nil, err\n"));

    let create = files
        .iter()
        .find(|f| f.path == PathBuf::from("internal/aboba/create.go"))
        .unwrap()
        .text()
        .into_owned();
    assert!(create.contains("\tin \"github.com/acme/shop/in\"\n"));
    assert!(create.contains("req in.CreateRequest"));
}

#[test]
fn generation_is_deterministic() {
    let pkg = parse_go_package(ABOBA, Some("github.com/acme/shop/in")).unwrap();
    for strategy in [Strategy::Basic, Strategy::Repository] {
        let first = strategy.generate(&pkg, &opts()).unwrap();
        let second = strategy.generate(&pkg, &opts()).unwrap();
        assert_eq!(first, second);
    }
}
