use std::fs;

use typesys_core::lang::languages::{CodeLanguage, SnipPosition};
use typesys_core::lang::ownership::{Ownership, ParentAction, ReferenceCountAction};

use crate::config::ParserConfig;
use crate::database::{Registry, TypeDatabase};
use crate::diagnostics::{TypesystemError, WarningKind};
use crate::model::{CodeGeneration, DocModificationMode, Modifiers, Removal, TypeEntry, TypeEntryKind};

fn parse(source: &str) -> TypeDatabase {
    let mut db = TypeDatabase::new();
    db.parse_str(source, true).unwrap();
    db
}

fn parse_err(source: &str) -> TypesystemError {
    let mut db = TypeDatabase::new();
    db.parse_str(source, true).unwrap_err()
}

fn message(err: &TypesystemError) -> String {
    err.innermost().to_string()
}

fn entry<'a>(db: &'a TypeDatabase, name: &str) -> &'a TypeEntry {
    db.entry(db.find_type(name).unwrap()).unwrap()
}

fn ts(body: &str) -> String {
    format!("<typesystem package='Foo'>{body}</typesystem>")
}

// --- entities ------------------------------------------------------------------

#[test]
fn primitive_defaults_target_names_to_its_own_name() {
    let db = parse(&ts("<primitive-type name='int'/><primitive-type name='qreal' target-lang-name='double'/>"));
    match &entry(&db, "int").kind {
        TypeEntryKind::Primitive(p) => {
            assert_eq!(p.target_lang_name, "int");
            assert_eq!(p.target_lang_api_name, "int");
            assert!(p.preferred_conversion);
        }
        other => panic!("unexpected kind {other:?}"),
    }
    assert_eq!(entry(&db, "qreal").target_lang_name(), "double");
}

#[test]
fn root_registers_the_module_entry() {
    let db = parse(&ts(""));
    let module = entry(&db, "Foo");
    assert!(matches!(module.kind, TypeEntryKind::TypeSystem));
    assert_eq!(module.code_generation, CodeGeneration::GenerateAll);
    assert!(db.required_target_imports().is_empty());
}

#[test]
fn enum_with_flags_registers_a_linked_flags_entry() {
    let db = parse(&ts("<enum-type name='Qt::AlignmentFlag' flags='Qt::Alignment'/>"));
    let e = entry(&db, "Qt::AlignmentFlag").as_enum().unwrap();
    assert_eq!(e.qualifier, "Qt");
    assert_eq!(e.enum_name, "AlignmentFlag");
    assert_eq!(e.package, "Foo");

    let flags_id = e.flags.unwrap();
    assert_eq!(db.find_type("QFlags<Qt::AlignmentFlag>"), Some(flags_id));
    match &db.entry(flags_id).unwrap().kind {
        TypeEntryKind::Flags(f) => {
            assert_eq!(f.original_name, "Qt::Alignment");
            assert_eq!(f.flags_name, "Alignment");
            assert_eq!(Some(f.originator), db.find_type("Qt::AlignmentFlag"));
        }
        other => panic!("unexpected kind {other:?}"),
    }
    assert!(db.warnings().is_empty());
}

#[test]
fn flags_with_a_different_qualifier_warn() {
    let db = parse(&ts("<enum-type name='Qt::AlignmentFlag' flags='QtGui::Alignment'/>"));
    let warnings = db.warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::QualifierMismatch);
    assert_eq!(warnings[0].message, "enum Qt and flags QtGui differ in qualifiers");
}

#[test]
fn anonymous_enum_uses_identified_by_value() {
    let db = parse(&ts("<enum-type identified-by-value='Qt::AutoConnection'/>"));
    assert!(entry(&db, "Qt::AutoConnection").as_enum().unwrap().anonymous);

    let err = parse_err(&ts("<enum-type name='E' identified-by-value='V'/>"));
    assert_eq!(message(&err), "can't specify both 'name' and 'identified-by-value' attributes");
}

#[test]
fn rejected_enum_values_respect_the_api_version() {
    let source = ts("<enum-type name='E'>\
           <reject-enum-value name='Old'/>\
           <reject-enum-value name='Future' since='5.0'/>\
         </enum-type>");
    let mut db = TypeDatabase::with_config(ParserConfig::new().with_api_version(4.8));
    db.parse_str(&source, true).unwrap();
    assert_eq!(entry(&db, "E").as_enum().unwrap().rejected_values, vec!["Old".to_string()]);
}

#[test]
fn unknown_container_kind_is_an_attribute_error() {
    let err = parse_err(&ts("<container-type name='QBag' type='bag'/>"));
    assert!(matches!(err.innermost(), TypesystemError::Attribute(_)));
    assert_eq!(message(&err), "there is no container of type 'bag'");
}

#[test]
fn duplicate_value_type_warns_and_keeps_the_first() {
    let db = parse(&ts("<value-type name='A' hash-function='first'/><value-type name='A'/>"));
    assert_eq!(entry(&db, "A").complex().unwrap().hash_function, "first");
    assert_eq!(db.warnings()[0].message, "Duplicate type entry: 'A'");
}

#[test]
fn synthesized_twins_report_duplicates() {
    let db = parse(&ts("<value-type name='QPaintDeviceInterface'/><interface-type name='QPaintDevice'/>"));
    let warnings = db.warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::DuplicateType);
    assert_eq!(warnings[0].message, "Duplicate type entry: 'QPaintDeviceInterface'");
    assert_eq!(entry(&db, "QPaintDeviceInterface").kind_name(), "value");

    let db = parse(&ts("<value-type name='QFlags&lt;Mode&gt;'/><enum-type name='Mode' flags='Modes'/>"));
    let messages: Vec<_> = db.warnings().into_iter().map(|w| w.message).collect();
    assert_eq!(messages, vec!["Duplicate type entry: 'QFlags<Mode>'".to_string()]);
}

#[test]
fn function_entries_collect_overloads() {
    let db = parse(&ts("<function signature='qHash(int)'/><function signature='qHash(const QString &amp;)'/>"));
    match &entry(&db, "qHash").kind {
        TypeEntryKind::Function { signatures } => assert_eq!(signatures.len(), 2),
        other => panic!("unexpected kind {other:?}"),
    }
    assert!(db.warnings().is_empty());

    let err = parse_err(&ts("<value-type name='qHash'/><function signature='qHash(int)'/>"));
    assert!(message(&err).starts_with("qHash expected to be a function, but isn't!"));
}

#[test]
fn interface_type_has_a_designated_interface() {
    let db = parse(&ts(
        "<interface-type name='QPaintDevice'>\
           <include file-name='QPaintDevice' location='global'/>\
           <modify-function signature='metric(PaintDeviceMetric)const' rename='metricValue'/>\
         </interface-type>",
    ));
    let object = entry(&db, "QPaintDevice");
    let twin_id = object.designated_interface().unwrap();
    let twin = db.entry(twin_id).unwrap();
    assert_eq!(twin.name, "QPaintDeviceInterface");
    assert_eq!(twin.complex().unwrap().origin, db.find_type("QPaintDevice"));
    assert_eq!(twin.include, object.include);
    assert_eq!(twin.complex().unwrap().function_mods.len(), 1);
}

#[test]
fn namespace_qualifies_nested_types() {
    let db = parse(&ts(
        "<namespace-type name='Ns'>\
           <value-type name='A'/>\
           <enum-type name='Mode'/>\
         </namespace-type>\
         <add-field name='a' type='Ns::A'/>",
    ));
    assert!(db.find_type("Ns::A").is_some());
    assert!(db.find_type("Ns::Mode").is_some());
    assert!(db.find_type("A").is_none());
    assert_eq!(db.global_user_fields()[0].type_entry, db.find_type("Ns::A"));
}

#[test]
fn complex_attributes_are_interpreted() {
    let db = parse(&ts(
        "<object-type name='QWidget' copyable='no' expense-cost='1' expense-limit='4' force-abstract='yes' generate='no'/>",
    ));
    let widget = entry(&db, "QWidget");
    assert_eq!(widget.code_generation, CodeGeneration::GenerateForSubclass);
    let complex = widget.complex().unwrap();
    assert_eq!(complex.expense.as_ref().unwrap().limit, 4);
    assert!(complex.type_flags.contains(crate::model::TypeFlags::FORCE_ABSTRACT));
    assert_eq!(complex.package, "Foo");

    let err = parse_err(&ts("<object-type name='X' expense-limit='lots'/>"));
    assert_eq!(message(&err), "Invalid expense-limit 'lots'");
}

// --- structure -----------------------------------------------------------------

#[test]
fn unknown_tags_are_fatal_with_a_position() {
    let err = parse_err("<typesystem package='P'>\n  <bogus/>\n</typesystem>");
    assert_eq!(message(&err), "Unknown tag name: 'bogus'");
    match err {
        TypesystemError::Located { line, file, .. } => {
            assert_eq!(line, 2);
            assert_eq!(file, "<memory>");
        }
        other => panic!("expected a located error, got {other:?}"),
    }
}

#[test]
fn placement_rules() {
    assert_eq!(
        message(&parse_err("<value-type name='A'/>")),
        "Document element must be 'typesystem', found 'value-type'"
    );
    assert_eq!(
        message(&parse_err(&ts("<value-type name='A'><value-type name='B'/></value-type>"))),
        "Nested types not supported"
    );
    assert_eq!(
        message(&parse_err(&ts("<modify-argument index='1'/>"))),
        "Tag requires parent: 'modify-argument'"
    );
    let err = parse_err(&ts("<value-type name='A'><remove-argument/></value-type>"));
    assert!(message(&err).starts_with("'remove-argument' requires "));
    assert!(message(&err).ends_with("found 'value-type'"));
}

#[test]
fn a_second_document_element_is_rejected() {
    let mut db = TypeDatabase::new();
    let err = db
        .parse_str("<typesystem package='A'/><typesystem package='B'><value-type name='V'/></typesystem>", true)
        .unwrap_err();
    assert!(matches!(err.innermost(), TypesystemError::Structural(_)));
    assert_eq!(message(&err), "'typesystem' must be the document element");
    assert!(db.find_type("V").is_none());
    assert!(db.find_type("B").is_none());
}

#[test]
fn missing_required_attribute_is_fatal() {
    let err = parse_err(&ts("<value-type name='A'><modify-function signature='f()'><modify-argument/></modify-function></value-type>"));
    assert_eq!(message(&err), "Required attribute 'index' missing for 'modify-argument'");
}

#[test]
fn unknown_attributes_and_bad_booleans_only_warn() {
    let db = parse(&ts("<value-type name='A' colour='red' stream='perhaps'/>"));
    let kinds: Vec<_> = db.warnings().iter().map(|w| w.kind).collect();
    assert_eq!(kinds, vec![WarningKind::UnknownAttribute, WarningKind::InvalidBoolean]);
    assert!(!entry(&db, "A").complex().unwrap().stream);
}

#[test]
fn suppressed_warnings_are_dropped() {
    let db = parse(&ts(
        "<suppress-warning text='Duplicate type entry: *'/>\
         <suppress-warning text=''/>\
         <value-type name='A'/><value-type name='A'/>",
    ));
    let warnings = db.warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::EmptySuppression);
}

#[test]
fn rejections_need_at_least_one_specific_field() {
    let db = parse(&ts("<rejection class='QObject' function-name='d_func'/>"));
    assert_eq!(db.rejections()[0].function_name, "d_func");
    assert!(!db.is_class_rejected("QObject"));

    let db = parse(&ts("<rejection class='QPrivate'/>"));
    assert!(db.is_class_rejected("QPrivate"));

    let err = parse_err(&ts("<rejection/>"));
    assert!(message(&err).starts_with("bad reject entry"));
}

// --- function modifications -------------------------------------------------------

#[test]
fn modify_function_attributes() {
    let db = parse(&ts(
        "<object-type name='QObject'>\
           <modify-function signature='deleteLater ( )' access='private' deprecated='yes' remove='all' \
                            rename='dispose' associated-to='destroyed()' thread='yes' virtual-slot='yes'/>\
         </object-type>",
    ));
    let m = &entry(&db, "QObject").complex().unwrap().function_mods[0];
    assert_eq!(m.signature, "deleteLater()");
    assert!(m.modifiers.contains(Modifiers::PRIVATE));
    assert!(m.is_deprecated());
    assert!(m.is_removed());
    assert_eq!(m.removal, Removal::All);
    assert!(m.is_renamed());
    assert_eq!(m.renamed_to.as_deref(), Some("dispose"));
    assert_eq!(m.association.as_deref(), Some("destroyed()"));
    assert!(m.thread);
    assert!(!m.allow_thread);
    assert!(m.modifiers.contains(Modifiers::VIRTUAL_SLOT));
}

#[test]
fn modify_function_rejects_bad_values() {
    let wrap = |attrs: &str| ts(&format!("<object-type name='O'><modify-function {attrs}/></object-type>"));
    assert_eq!(message(&parse_err(&wrap(""))), "No signature for modified function");
    assert_eq!(
        message(&parse_err(&wrap("signature='f()' access='friendly'"))),
        "Bad access type 'friendly'"
    );
    assert_eq!(
        message(&parse_err(&wrap("signature='f()' remove='some'"))),
        "Bad removal type 'some'"
    );
}

#[test]
fn access_rename_and_remove_children() {
    let db = parse(&ts(
        "<object-type name='O'>\
           <modify-function signature='f(int)'>\
             <access modifier='final'/>\
             <rename to='g'/>\
             <remove class='target'/>\
           </modify-function>\
         </object-type>",
    ));
    let m = &entry(&db, "O").complex().unwrap().function_mods[0];
    assert!(m.modifiers.contains(Modifiers::FINAL | Modifiers::RENAME));
    assert_eq!(m.renamed_to.as_deref(), Some("g"));
    assert_eq!(m.removal, Removal::TargetOnly);

    let err = parse_err(&ts("<object-type name='O'><modify-function signature='f()'><access modifier='sealed'/></modify-function></object-type>"));
    assert_eq!(message(&err), "Unknown access modifier: 'sealed'");
    let err = parse_err(&ts("<object-type name='O'><modify-function signature='f()'><rename/></modify-function></object-type>"));
    assert_eq!(message(&err), "Rename modifier requires 'to' attribute");
}

#[test]
fn add_function_on_a_type() {
    let db = parse(&ts(
        "<value-type name='QPoint'>\
           <add-function signature='manhattan(const QPoint &amp; other)' return-type='int' static='yes' access='protected'/>\
           <add-function signature='reset'/>\
         </value-type>",
    ));
    let complex = entry(&db, "QPoint").complex().unwrap();
    assert_eq!(complex.added_functions.len(), 2);
    let f = &complex.added_functions[0].function;
    assert_eq!(f.name, "manhattan");
    assert!(f.is_static);
    assert_eq!(f.access, typesys_syntax::signature::FunctionAccess::Protected);
    assert_eq!(f.arguments.len(), 1);
    assert_eq!(complex.added_functions[1].signature, "reset()");
    assert_eq!(complex.function_mods.len(), 2);
    assert_eq!(complex.function_mods[1].signature, "reset()");
}

#[test]
fn global_add_function_goes_to_the_registry() {
    let db = parse(&ts(
        "<add-function signature='qVersion()' return-type='const char*'>\
           <inject-code class='target' position='beginning'>return \"1.0\";</inject-code>\
         </add-function>",
    ));
    assert_eq!(db.global_user_functions().len(), 1);
    let mods = db.global_user_function_modifications();
    assert_eq!(mods.len(), 1);
    assert_eq!(mods[0].snips[0].code.literal_text(), "return \"1.0\";");
    assert!(mods[0].modifiers.contains(Modifiers::CODE_INJECTION));

    let mut db = TypeDatabase::new();
    db.parse_str(&ts("<add-function signature='qVersion()'/>"), false).unwrap();
    assert!(db.global_user_functions().is_empty());
}

#[test]
fn add_function_rejects_empty_signatures_and_bad_access() {
    assert_eq!(
        message(&parse_err(&ts("<add-function signature=' '/>"))),
        "No signature for the added function"
    );
    assert_eq!(
        message(&parse_err(&ts("<add-function signature='f()' access='private'/>"))),
        "Bad access type 'private'"
    );
    let err = parse_err(&ts("<add-function signature='f(QList&lt;int&gt;&gt; x)'/>"));
    assert!(matches!(err.innermost(), TypesystemError::Signature(_)));
}

#[test]
fn argument_modifications() {
    let db = parse(&ts(
        "<object-type name='QLayout'>\
           <modify-function signature='addWidget(QWidget*)'>\
             <modify-argument index='1' invalidate-after-use='yes'>\
               <define-ownership class='target' owner='c++'/>\
               <reference-count action='add' variable-name='widgets'/>\
               <parent index='this' action='add'/>\
               <replace-type modified-type='QObject*'/>\
               <replace-default-expression with='0'/>\
               <no-null-pointer/>\
               <rename to='child'/>\
             </modify-argument>\
             <modify-argument index='return' replace-value='this'>\
               <no-null-pointer default-value='nullptr'/>\
               <remove-default-expression/>\
               <remove-argument/>\
             </modify-argument>\
           </modify-function>\
         </object-type>",
    ));
    let m = &entry(&db, "QLayout").complex().unwrap().function_mods[0];
    assert_eq!(m.argument_mods.len(), 2);

    let first = &m.argument_mods[0];
    assert_eq!(first.index, 1);
    assert!(first.reset_after_use);
    assert_eq!(first.ownerships.get(&CodeLanguage::Target), Some(&Ownership::Native));
    assert_eq!(first.reference_counts[0].action, ReferenceCountAction::Add);
    assert_eq!(first.reference_counts[0].variable_name, "widgets");
    let owner = first.owner.unwrap();
    assert_eq!(owner.index, -1);
    assert_eq!(owner.action, ParentAction::Add);
    assert_eq!(first.modified_type.as_deref(), Some("QObject*"));
    assert_eq!(first.replaced_default_expression.as_deref(), Some("0"));
    assert!(first.no_null_pointers);
    assert_eq!(first.renamed_to.as_deref(), Some("child"));
    assert!(first.modifiers.contains(Modifiers::RENAME));

    let ret = &m.argument_mods[1];
    assert_eq!(ret.index, 0);
    assert_eq!(ret.replace_value.as_deref(), Some("this"));
    assert_eq!(ret.null_pointer_default_value.as_deref(), Some("nullptr"));
    assert!(ret.removed_default_expression);
    assert!(ret.removed);
    assert!(db.warnings().is_empty());
}

#[test]
fn argument_modification_errors_and_warnings() {
    let wrap = |body: &str| {
        ts(&format!(
            "<object-type name='O'><modify-function signature='f(int)'>{body}</modify-function></object-type>"
        ))
    };
    assert_eq!(
        message(&parse_err(&wrap("<modify-argument index='1' replace-value='0'/>"))),
        "replace-value is only supported for return values (index=0)."
    );
    assert_eq!(
        message(&parse_err(&wrap("<modify-argument index='one'/>"))),
        "Cannot convert 'one' to integer"
    );
    assert_eq!(
        message(&parse_err(&wrap(
            "<modify-argument index='1'><define-ownership class='target' owner='nobody'/></modify-argument>"
        ))),
        "unsupported owner attribute: 'nobody'"
    );
    assert_eq!(
        message(&parse_err(&wrap("<modify-argument index='1'><replace-type/></modify-argument>"))),
        "Type replacement requires 'modified-type' attribute"
    );
    assert_eq!(
        message(&parse_err(&wrap(
            "<modify-argument index='1'><replace-default-expression/></modify-argument>"
        ))),
        "Default expression replaced with empty string. Use remove-default-expression instead."
    );
    assert_eq!(
        message(&parse_err(&wrap(
            "<modify-argument index='1'><parent index='0' action='adopt'/></modify-argument>"
        ))),
        "Invalid parent action 'adopt'"
    );

    let db = parse(&wrap(
        "<modify-argument index='1'>\
           <no-null-pointer default-value='0'/>\
           <reference-count action='steal'/>\
         </modify-argument>",
    ));
    let kinds: Vec<_> = db.warnings().iter().map(|w| w.kind).collect();
    assert_eq!(kinds, vec![WarningKind::NullPointerDefault, WarningKind::InvalidReferenceCount]);
    let arg = &entry(&db, "O").complex().unwrap().function_mods[0].argument_mods[0];
    assert!(arg.no_null_pointers);
    assert!(arg.null_pointer_default_value.is_none());
    assert!(arg.reference_counts.is_empty());
}

#[test]
fn argument_conversion_rules_collect_code() {
    let db = parse(&ts(
        "<template name='convert'>%out = toNative(%in);</template>\
         <value-type name='V'>\
           <modify-function signature='set(int)'>\
             <modify-argument index='1'>\
               <conversion-rule class='native'>int x;<insert-template name='convert'/></conversion-rule>\
             </modify-argument>\
           </modify-function>\
         </value-type>",
    ));
    let rule = &entry(&db, "V").complex().unwrap().function_mods[0].argument_mods[0].conversion_rules[0];
    assert_eq!(rule.language, CodeLanguage::Native);
    assert_eq!(rule.position, SnipPosition::Beginning);
    assert_eq!(
        rule.code.render(&db),
        "int x;// TEMPLATE - convert - START%out = toNative(%in);// TEMPLATE - convert - END"
    );
}

// --- fields ----------------------------------------------------------------------

#[test]
fn modify_field_and_children() {
    let db = parse(&ts(
        "<value-type name='V'>\
           <modify-field name='x' write='false'><rename to='xPos'/></modify-field>\
           <modify-field><access modifier='private'/></modify-field>\
         </value-type>",
    ));
    let v = entry(&db, "V");
    let fields = &v.complex().unwrap().field_mods;
    assert_eq!(fields.len(), 1);
    assert!(fields[0].is_readable());
    assert!(!fields[0].is_writable());
    assert_eq!(fields[0].renamed_to.as_deref(), Some("xPos"));
    assert!(v.field_modification("y").is_writable());
}

#[test]
fn add_field_records_type_and_default() {
    let db = parse(&ts(
        "<primitive-type name='double'/>\
         <value-type name='V'><add-field name='weight' type='const double'>  1.5\n</add-field></value-type>\
         <add-field name='counter' type='int'/>",
    ));
    let field = &entry(&db, "V").complex().unwrap().added_fields[0];
    assert_eq!(field.name, "weight");
    assert_eq!(field.type_entry, db.find_type("double"));
    assert_eq!(field.default_value, "1.5");
    assert_eq!(field.enclosing.as_deref(), Some("V"));
    assert!(field.field_type.is_const);

    let global = &db.global_user_fields()[0];
    assert_eq!(global.name, "counter");
    assert!(global.enclosing.is_none());
    assert!(global.type_entry.is_none());
}

// --- code and templates ------------------------------------------------------------

#[test]
fn inject_code_on_types_and_root() {
    let db = parse(&ts(
        "<inject-code class='native' position='beginning'>#include &lt;x&gt;</inject-code>\
         <object-type name='O'>\
           <inject-code class='target' position='end'>extra()</inject-code>\
         </object-type>",
    ));
    let module = entry(&db, "Foo");
    assert_eq!(module.code_snips[0].code.literal_text(), "#include <x>");
    let snip = &entry(&db, "O").code_snips[0];
    assert_eq!(snip.language, CodeLanguage::Target);
    assert_eq!(snip.position, SnipPosition::End);
}

#[test]
fn inject_code_is_gated_by_the_api_version() {
    let source = ts("<object-type name='O'>\
           <inject-code>always();</inject-code>\
           <inject-code since='2.0'>later();</inject-code>\
           <modify-function signature='f()' since='2.0' rename='g'/>\
         </object-type>");
    let mut db = TypeDatabase::with_config(ParserConfig::new().with_api_version(1.0));
    db.parse_str(&source, true).unwrap();

    let o = entry(&db, "O");
    assert_eq!(o.code_snips.len(), 2);
    let visible: Vec<_> = o.code_snips(db.config()).map(|s| s.code.literal_text()).collect();
    assert_eq!(visible, vec!["always();".to_string()]);
    assert_eq!(o.function_modifications("f()", db.config()).count(), 0);
}

#[test]
fn inject_code_placement_rules() {
    let err = parse_err(&ts("<object-type name='O'><inject-code class='interface'/></object-type>"));
    assert_eq!(
        message(&err),
        "Interface code injections must be direct child of an interface type entry"
    );
    let err = parse_err(&ts(
        "<object-type name='O'><modify-function signature='f()'><inject-code class='shell-declaration'/></modify-function></object-type>",
    ));
    assert_eq!(
        message(&err),
        "no function implementation in shell declaration in which to inject code"
    );
    let err = parse_err(&ts("<object-type name='O'><inject-code class='python'/></object-type>"));
    assert_eq!(message(&err), "Invalid class specifier: 'python'");
}

#[test]
fn argument_maps_only_apply_to_function_snips() {
    let db = parse(&ts(
        "<object-type name='O'>\
           <modify-function signature='f(int)'>\
             <inject-code><argument-map index='1' meta-name='%1'/>call(%1);</inject-code>\
           </modify-function>\
           <inject-code><argument-map index='1' meta-name='%1'/></inject-code>\
         </object-type>",
    ));
    let snip = &entry(&db, "O").complex().unwrap().function_mods[0].snips[0];
    assert_eq!(snip.argument_map.get(&1).map(String::as_str), Some("%1"));
    assert_eq!(snip.code.literal_text(), "call(%1);");
    let warnings = db.warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings[0].message,
        "Argument maps are only useful for injection of code into functions."
    );

    let err = parse_err(&ts(
        "<object-type name='O'><inject-code><argument-map index='0'/></inject-code></object-type>",
    ));
    assert_eq!(message(&err), "Argument position 0 must be a positive number");
}

#[test]
fn templates_expand_with_replace_rules() {
    let db = parse(&ts(
        "<template name='t'>x = %VAR;</template>\
         <object-type name='O'>\
           <inject-code><insert-template name='t'><replace from='%VAR' to='42'/></insert-template></inject-code>\
         </object-type>",
    ));
    assert_eq!(db.find_template("t").unwrap().code.literal_text(), "x = %VAR;");
    assert_eq!(
        entry(&db, "O").code_snips[0].code.render(&db),
        "// TEMPLATE - t - STARTx = 42;// TEMPLATE - t - END"
    );
}

#[test]
fn undefined_template_warns_on_render() {
    let db = parse(&ts(
        "<object-type name='O'><inject-code>a<insert-template name='missing'/>b</inject-code></object-type>",
    ));
    assert_eq!(entry(&db, "O").code_snips[0].code.render(&db), "ab");
    assert_eq!(db.warnings()[0].kind, WarningKind::UndefinedTemplate);
}

#[test]
fn custom_constructor_defaults_derive_from_the_entity() {
    let db = parse(&ts(
        "<value-type name='QColor'>\
           <custom-constructor>return new QColor(*copy);</custom-constructor>\
           <custom-destructor name='destroy'/>\
         </value-type>",
    ));
    let color = entry(&db, "QColor");
    let ctor = color.custom_constructor.as_ref().unwrap();
    assert_eq!(ctor.name, "qcolor_create");
    assert_eq!(ctor.param_name, "copy");
    assert_eq!(ctor.code.literal_text(), "return new QColor(*copy);");
    assert_eq!(color.custom_destructor.as_ref().unwrap().name, "destroy");
}

#[test]
fn includes_and_extra_includes() {
    let db = parse(&ts(
        "<value-type name='V'>\
           <include file-name='v.h' location='local'/>\
           <extra-includes><include file-name='QtCore' location='global'/></extra-includes>\
         </value-type>",
    ));
    let v = entry(&db, "V");
    assert_eq!(v.include.as_ref().unwrap().file_name, "v.h");
    assert_eq!(v.extra_includes[0].file_name, "QtCore");

    let err = parse_err(&ts("<value-type name='V'><include file-name='v.h' location='remote'/></value-type>"));
    assert_eq!(message(&err), "Location not recognized: 'remote'");
}

// --- documentation -----------------------------------------------------------------

#[test]
fn documentation_inherits_the_current_signature() {
    let db = parse(&ts(
        "<object-type name='O'>\
           <inject-documentation mode='append'>Type docs.</inject-documentation>\
           <modify-function signature='f(int)'>\
             <inject-documentation format='target' mode='prepend'>Function docs.</inject-documentation>\
           </modify-function>\
           <modify-documentation xpath='description'>New</modify-documentation>\
         </object-type>",
    ));
    let docs = &entry(&db, "O").doc_modifications;
    assert_eq!(docs.len(), 3);
    assert_eq!(docs[0].mode, DocModificationMode::Append);
    assert_eq!(docs[0].signature, "");
    assert_eq!(docs[0].code.literal_text(), "Type docs.");
    assert_eq!(docs[1].mode, DocModificationMode::Prepend);
    assert_eq!(docs[1].signature, "f(int)");
    assert_eq!(docs[1].format, CodeLanguage::Target);
    assert_eq!(docs[2].mode, DocModificationMode::XPathReplace);
    assert_eq!(docs[2].xpath, "description");

    let err = parse_err(&ts("<object-type name='O'><inject-documentation mode='merge'/></object-type>"));
    assert_eq!(message(&err), "Unknown documentation injection mode: 'merge'");
}

// --- external files ---------------------------------------------------------------

#[test]
fn import_file_quotes_a_window_into_the_enclosing_code() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("snippets.cpp"), "// @snippet a\nfoo();\nbar();\n// @snippet a\nbaz();\n").unwrap();

    let mut db = TypeDatabase::with_config(ParserConfig::new().with_import_fallback_dir(dir.path()));
    db.parse_str(
        &ts("<object-type name='O'><inject-code>\
               <import-file name='snippets.cpp' quote-after-line='@snippet a' quote-before-line='@snippet a'/>\
             </inject-code></object-type>"),
        true,
    )
    .unwrap();
    assert_eq!(entry(&db, "O").code_snips[0].code.literal_text(), "foo();\nbar();\n");

    let err = db
        .parse_str(&ts("<object-type name='P'><inject-code><import-file name='nope.cpp'/></inject-code></object-type>"), true)
        .unwrap_err();
    assert_eq!(message(&err), "Could not open file: 'nope.cpp'");
}

#[test]
fn inject_code_file_is_wrapped_in_a_banner() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("glue.cpp");
    fs::write(&path, "glue();").unwrap();

    let source = ts(&format!(
        "<object-type name='O'>\
           <modify-function signature='f()'><inject-code file='{}'/></modify-function>\
           <inject-code file='missing.cpp'/>\
         </object-type>",
        path.display()
    ));
    let db = parse(&source);
    let o = entry(&db, "O");
    let m = &o.complex().unwrap().function_mods[0];
    let text = m.snips[0].code.literal_text();
    assert!(text.contains("// START of custom code block [file: "));
    assert!(text.contains("glue();\n// END of custom code block"));
    assert!(m.modifiers.contains(Modifiers::CODE_INJECTION));

    let warnings = db.warnings();
    assert_eq!(warnings[0].kind, WarningKind::MissingFile);
    assert_eq!(warnings[0].message, "File for inject code not exist: missing.cpp");
}

#[test]
fn type_conversion_rule_is_read_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conv.cpp");
    fs::write(&path, "convert();").unwrap();

    let rule = format!("<conversion-rule file='{}'/>", path.display());
    let db = parse(&ts(&format!("<primitive-type name='QString'>{rule}</primitive-type>")));
    assert!(entry(&db, "QString").conversion_rule.as_ref().unwrap().contains("convert();"));

    let err = parse_err(&ts(&format!("<value-type name='V'>{rule}{rule}</value-type>")));
    assert_eq!(message(&err), "Types can have only one conversion rule");
}

#[test]
fn load_typesystem_parses_dependencies_once() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("typesystem_core.xml"),
        "<typesystem package='Core'><primitive-type name='int'/><value-type name='QPoint'/></typesystem>",
    )
    .unwrap();

    let mut db = TypeDatabase::with_config(ParserConfig::new().with_typesystem_path(dir.path()));
    db.parse_str(
        "<typesystem package='Gui'>\
           <load-typesystem name='typesystem_core.xml' generate='no'/>\
           <load-typesystem name='typesystem_core.xml' generate='no'/>\
           <object-type name='QWidget'/>\
         </typesystem>",
        true,
    )
    .unwrap();

    assert_eq!(db.find_all("int").len(), 1);
    assert_eq!(entry(&db, "QPoint").code_generation, CodeGeneration::GenerateNothing);
    assert_eq!(entry(&db, "QWidget").code_generation, CodeGeneration::GenerateAll);
    assert_eq!(db.required_target_imports(), &["Core".to_string()]);
}

#[test]
fn nested_document_errors_keep_their_own_location() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("broken.xml"), "<typesystem package='B'>\n\n<oops/></typesystem>").unwrap();

    let mut db = TypeDatabase::with_config(ParserConfig::new().with_typesystem_path(dir.path()));
    let err = db
        .parse_str("<typesystem package='A'><load-typesystem name='broken.xml'/></typesystem>", true)
        .unwrap_err();
    match err {
        TypesystemError::Located { file, line, .. } => {
            assert!(file.ends_with("broken.xml"));
            assert_eq!(line, 3);
        }
        other => panic!("expected a located error, got {other:?}"),
    }
}

#[test]
fn missing_dependency_is_a_resource_error() {
    let mut db = TypeDatabase::with_config(ParserConfig {
        typesystem_paths: Vec::new(),
        ..ParserConfig::new()
    });
    let err = db
        .parse_str(&ts("<load-typesystem name='typesystem_nowhere.xml'/>"), true)
        .unwrap_err();
    assert!(matches!(err.innermost(), TypesystemError::Resource(_)));
}
