// Scope and type checking over the IR. Expression nodes get their `ty`
// filled in; every problem found is collected, analysis never stops early.

mod expressions;
mod scope;

pub use scope::{FrameId, ScopeStack};

use ir::{Call, Function, Program, Scope, Statement, StmtKind, Type, Variable, WRITELN};
use model::Diagnostic;
use std::collections::HashMap;
use tracing::{debug, info_span};

/// Built-in operations that occupy the subroutine namespace.
pub const INTRINSICS: [&str; 2] = ["read", WRITELN];

#[derive(Debug, Clone)]
pub(crate) struct FunctionInfo {
    pub(crate) params: Vec<Type>,
    pub(crate) return_type: Type,
}

/// Which body is being analyzed; decides what `return` may carry.
#[derive(Debug, Clone)]
enum Context {
    Main,
    Subroutine { name: String, return_type: Type },
}

pub struct SemanticAnalyzer {
    pub(crate) scopes: ScopeStack,
    pub(crate) functions: HashMap<String, FunctionInfo>,
    context: Context,
    pub(crate) diagnostics: Vec<Diagnostic>,
    /// Line of the statement being analyzed; every diagnostic points here.
    pub(crate) line: usize,
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            scopes: ScopeStack::new(),
            functions: HashMap::new(),
            context: Context::Main,
            diagnostics: Vec::new(),
            line: 0,
        }
    }

    /// Check the whole program, annotating expression types in place.
    pub fn analyze(mut self, program: &mut Program) -> Vec<Diagnostic> {
        let span = info_span!("semantic", program = %program.name);
        let _guard = span.enter();

        self.collect_functions(&program.functions);
        for function in &mut program.functions {
            self.analyze_function(function);
        }

        self.context = Context::Main;
        self.analyze_scope(&mut program.scope);

        debug!(diagnostics = self.diagnostics.len(), "semantic analysis finished");
        self.diagnostics
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::semantic(self.line, message));
    }

    fn collect_functions(&mut self, functions: &[Function]) {
        for function in functions {
            self.line = function.line;
            if INTRINSICS.contains(&function.name.as_str()) || self.functions.contains_key(&function.name) {
                self.error(format!("{} already in scope.", function.name));
                continue;
            }
            let info = FunctionInfo {
                params: function.params.iter().map(|p| p.ty.clone()).collect(),
                return_type: function.return_type.clone(),
            };
            self.functions.insert(function.name.clone(), info);
        }
    }

    /// Parameters and the body's top-level declarations share one frame.
    fn analyze_function(&mut self, function: &mut Function) {
        self.line = function.line;
        if function.return_type != Type::Void && !function.return_type.is_storable() {
            self.error(format!("Unknown type {}.", base_name(&function.return_type)));
        }
        self.context = Context::Subroutine {
            name: function.name.clone(),
            return_type: function.return_type.clone(),
        };

        self.scopes.enter();
        for param in &function.params {
            self.line = param.line;
            if !param.ty.is_storable() {
                self.error(format!("Unknown type {}.", base_name(&param.ty)));
            }
            self.declare(&param.name, &param.ty);
        }
        for statement in &mut function.scope.statements {
            self.analyze_statement(statement);
        }
        self.scopes.exit();
    }

    fn analyze_scope(&mut self, scope: &mut Scope) {
        self.scopes.enter();
        for statement in &mut scope.statements {
            self.analyze_statement(statement);
        }
        self.scopes.exit();
    }

    fn analyze_statement(&mut self, statement: &mut Statement) {
        self.line = statement.line;
        match &mut statement.kind {
            StmtKind::Declare { names, r#type, size } => self.analyze_declare(names, r#type, size.as_mut()),
            StmtKind::Assign { name, index, expr } => self.analyze_assign(name, index.as_mut(), expr),
            StmtKind::Call(call) => {
                self.analyze_call(call, false);
            }
            StmtKind::Return(value) => self.analyze_return(value.as_mut()),
            StmtKind::Read(targets) => {
                for target in targets.iter_mut() {
                    self.analyze_read_target(target);
                }
            }
            StmtKind::Assert(cond) => self.expect_condition(cond),
            StmtKind::If { cond, then_scope, else_scope } => {
                self.expect_condition(cond);
                self.analyze_scope(then_scope);
                if let Some(else_scope) = else_scope {
                    self.analyze_scope(else_scope);
                }
            }
            StmtKind::While { cond, body } => {
                self.expect_condition(cond);
                self.analyze_scope(body);
            }
            StmtKind::Scope(scope) => self.analyze_scope(scope),
        }
    }

    fn analyze_declare(&mut self, names: &[String], ty: &Type, size: Option<&mut ir::Expr>) {
        if !ty.is_storable() {
            self.error(format!("Unknown type {}.", base_name(ty)));
        }
        match size {
            Some(size) => {
                let size_ty = self.analyze_expr(size);
                if is_known(&size_ty) && size_ty != Type::Integer {
                    self.error(format!("Array size must be integer, found {}.", size_ty));
                }
            }
            None if ty.is_array() => {
                self.error(format!("Array {} needs a size.", names.join(", ")));
            }
            None => {}
        }
        for name in names {
            self.declare(name, ty);
        }
    }

    /// `true` and `false` are bound everywhere as boolean literals.
    fn declare(&mut self, name: &str, ty: &Type) {
        if ir::is_boolean_name(name) || !self.scopes.declare(name, ty.clone()) {
            self.error(format!("{} already in scope.", name));
        }
    }

    fn analyze_assign(&mut self, name: &str, index: Option<&mut ir::Expr>, expr: &mut ir::Expr) {
        let declared = self.scopes.lookup(name).cloned();
        if declared.is_none() {
            self.error(format!("{} not in scope.", name));
        }

        let target = match (declared, index) {
            (Some(ty), Some(index)) => {
                self.expect_index(index);
                match ty.element() {
                    Some(element) => Some(element.clone()),
                    None => {
                        self.error(format!("{} is not an array.", name));
                        None
                    }
                }
            }
            (None, Some(index)) => {
                self.analyze_expr(index);
                None
            }
            (declared, None) => declared,
        };

        let value = self.analyze_expr(expr);
        if let Some(target) = target {
            if is_known(&target) && is_known(&value) && target != value {
                self.error(format!("Type mismatch: cannot assign {} to {} of type {}.", value, name, target));
            }
        }
    }

    fn analyze_return(&mut self, value: Option<&mut ir::Expr>) {
        let found = value.map(|expr| self.analyze_expr(expr));
        match (self.context.clone(), found) {
            (Context::Main, Some(_)) => self.error("Cannot return a value from the main program."),
            (Context::Main, None) => {}
            (Context::Subroutine { name, return_type }, found) => match (return_type, found) {
                (Type::Void, Some(_)) => self.error(format!("Cannot return a value from procedure {}.", name)),
                (Type::Void, None) => {}
                (expected, None) => {
                    self.error(format!("Function {} must return a value of type {}.", name, expected))
                }
                (expected, Some(found)) => {
                    if is_known(&expected) && is_known(&found) && expected != found {
                        self.error(format!("Type mismatch: {} returns {}, found {}.", name, expected, found));
                    }
                }
            },
        }
    }

    fn analyze_read_target(&mut self, target: &mut Variable) {
        let ty = self.analyze_variable(target);
        if is_known(&ty) && !matches!(ty, Type::Integer | Type::Real | Type::String) {
            self.error(format!("Cannot read into {} of type {}.", target.name, ty));
        }
    }

    /// Returns the type the call produces as a value.
    pub(crate) fn analyze_call(&mut self, call: &mut Call, as_value: bool) -> Type {
        let arg_types: Vec<Type> = call.args.iter_mut().map(|arg| self.analyze_expr(arg)).collect();
        call.signature = ir::Signature(arg_types.clone());

        if INTRINSICS.contains(&call.name.as_str()) {
            if call.name == WRITELN {
                for ty in arg_types.iter().filter(|ty| is_known(ty) && !ty.is_scalar()) {
                    self.error(format!("Cannot write value of type {}.", ty));
                }
            }
            if as_value {
                self.error(format!("{} does not return a value.", call.name));
            }
            return Type::Void;
        }

        let Some(info) = self.functions.get(&call.name).cloned() else {
            self.error(format!("{} not in scope.", call.name));
            return Type::Void;
        };

        if info.params.len() != arg_types.len() {
            self.error(format!(
                "{} expects {} arguments, found {}.",
                call.name,
                info.params.len(),
                arg_types.len()
            ));
        } else {
            for (position, (expected, found)) in info.params.iter().zip(&arg_types).enumerate() {
                if is_known(expected) && is_known(found) && expected != found {
                    self.error(format!(
                        "Type mismatch: argument {} of {} expects {}, found {}.",
                        position + 1,
                        call.name,
                        expected,
                        found
                    ));
                }
            }
        }

        if as_value && info.return_type == Type::Void {
            self.error(format!("{} does not return a value.", call.name));
        }
        info.return_type
    }
}

/// Analyze a lowered program and return every semantic diagnostic.
pub fn analyze(program: &mut Program) -> Vec<Diagnostic> {
    SemanticAnalyzer::new().analyze(program)
}

/// Types precise enough to compare. Void marks an expression whose error
/// was already reported.
pub(crate) fn is_known(ty: &Type) -> bool {
    match ty {
        Type::Void | Type::Unknown(_) => false,
        Type::Array(element) => is_known(element),
        _ => true,
    }
}

fn base_name(ty: &Type) -> String {
    ty.element().unwrap_or(ty).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ir::{ExprKind, Signature};

    fn lowered(src: &str) -> Program {
        let parsed = parser::parse(src);
        assert!(parsed.is_success(), "parse failed: {:?}", parsed.diagnostics);
        ir::lower(&parsed.program)
    }

    fn check(src: &str) -> Vec<String> {
        let mut program = lowered(src);
        analyze(&mut program).into_iter().map(|d| d.message).collect()
    }

    fn check_body(body: &str) -> Vec<String> {
        check(&format!("program t;\nbegin\n{}\nend.", body))
    }

    #[test]
    fn clean_program_has_no_diagnostics() {
        let diags = check_body(
            "var x, y: integer;\nvar s: string;\nx := 1;\ny := x * 2 + 3;\ns := \"a\" + \"b\";\n\
             if x < y then writeln(s) else writeln(x);\nwhile x > 0 do x := x - 1",
        );
        assert!(diags.is_empty(), "{:?}", diags);
    }

    #[test]
    fn duplicate_in_same_block() {
        let diags = check_body("var x: int;\nvar x: int;");
        assert_eq!(diags, vec!["x already in scope."]);
    }

    #[test]
    fn boolean_names_cannot_be_declared() {
        assert_eq!(
            check_body("var true: integer;\nbegin var false: string end"),
            vec!["true already in scope.", "false already in scope."]
        );
        let src = "program t;\nprocedure p(true: integer);\nbegin end;\nbegin end.";
        assert_eq!(check(src), vec!["true already in scope."]);
    }

    #[test]
    fn shadowing_in_nested_block_is_allowed() {
        let diags = check_body("var x: int;\nbegin var x: int; x := 2 end;\nx := 1");
        assert!(diags.is_empty(), "{:?}", diags);
    }

    #[test]
    fn nested_declaration_is_gone_after_block() {
        let diags = check_body("begin var y: int; y := 1 end;\ny := 2");
        assert_eq!(diags, vec!["y not in scope."]);
    }

    #[test]
    fn use_before_declaration() {
        let diags = check_body("y := 1");
        assert_eq!(diags, vec!["y not in scope."]);
    }

    #[test]
    fn string_assigned_to_integer() {
        let diags = check_body("var x: integer;\nx := \"five\"");
        assert_eq!(diags, vec!["Type mismatch: cannot assign string to x of type integer."]);
    }

    #[test]
    fn no_implicit_widening() {
        let diags = check_body("var r: real;\nr := 1");
        assert_eq!(diags.len(), 1);
        assert!(diags[0].contains("integer") && diags[0].contains("real"));
    }

    #[test]
    fn binary_operands_must_agree() {
        let diags = check_body("var r: real;\nr := 1.5 + 2");
        assert_eq!(diags, vec!["Type mismatch: real + integer."]);
    }

    #[test]
    fn errors_are_not_repeated_upwards() {
        let diags = check_body("var x: integer;\nx := missing + 1");
        assert_eq!(diags, vec!["missing not in scope."]);
    }

    #[test]
    fn diagnostics_carry_statement_line() {
        let mut program = lowered("program t;\nbegin\n  var x: integer;\n\n  x := true\nend.");
        let diags = analyze(&mut program);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].line, 5);
        assert_eq!(diags[0].to_string(), "[line 5] Error: Type mismatch: cannot assign boolean to x of type integer.");
    }

    #[test]
    fn operator_applicability() {
        assert_eq!(check_body("var b: boolean;\nb := true + false"), vec!["Operator + cannot be applied to boolean."]);
        assert_eq!(check_body("var s: string;\ns := \"a\" - \"b\""), vec!["Operator - cannot be applied to string."]);
        assert_eq!(check_body("var r: real;\nr := 5.0 % 2.0"), vec!["Operator % cannot be applied to real."]);
        assert_eq!(check_body("var b: boolean;\nb := not 1"), vec!["Operator not cannot be applied to integer."]);
        assert_eq!(check_body("var i: integer;\ni := i.size"), vec!["Operator .size cannot be applied to integer."]);
    }

    #[test]
    fn comparisons_are_boolean() {
        let diags = check_body("var b: boolean;\nvar s: string;\nb := s = \"x\";\nb := (1 < 2) and true");
        assert!(diags.is_empty(), "{:?}", diags);
    }

    #[test]
    fn conditions_must_be_boolean() {
        let diags = check_body("var x: integer;\nif x then x := 1;\nwhile 1 do x := 2;\nassert(x)");
        assert_eq!(diags.len(), 3);
        assert!(diags.iter().all(|d| d == "Condition must be boolean, found integer."));
    }

    #[test]
    fn arrays_and_indices() {
        let diags = check_body(
            "var a: array [10] of integer;\nvar n: integer;\na[0] := 5;\nn := a[1] + a.size;\na[true] := 1;\nn[0] := 2;\na := 3",
        );
        assert_eq!(
            diags,
            vec![
                "Array index must be integer, found boolean.",
                "n is not an array.",
                "Type mismatch: cannot assign integer to a of type integer_arr.",
            ]
        );
    }

    #[test]
    fn array_declarations_need_integer_size() {
        assert_eq!(check_body("var a: array [] of integer"), vec!["Array a needs a size."]);
        assert_eq!(check_body("var a: array [1.5] of integer"), vec!["Array size must be integer, found real."]);
        assert!(check_body("var n: integer;\nn := 4;\nbegin var a: array [n * 2] of real end").is_empty());
    }

    #[test]
    fn unknown_type_names() {
        assert_eq!(check_body("var c: char"), vec!["Unknown type char."]);
        assert_eq!(check_body("var c: array [2] of char"), vec!["Unknown type char."]);
        assert_eq!(check_body("var v: void"), vec!["Unknown type void."]);
    }

    #[test]
    fn read_targets() {
        let diags = check_body("var x: integer;\nvar b: boolean;\nvar a: array [3] of real;\nread(x, a[0], b)");
        assert_eq!(diags, vec!["Cannot read into b of type boolean."]);
    }

    #[test]
    fn integer_literal_range() {
        assert!(check_body("var x: integer;\nx := 2147483647").is_empty());
        assert_eq!(
            check_body("var x: integer;\nx := 2147483648"),
            vec!["Integer literal 2147483648 out of range."]
        );
    }

    #[test]
    fn real_literal_range() {
        assert!(check_body("var r: real;\nr := 1.7e308;\nr := 1.0e-999").is_empty());
        assert_eq!(check_body("var r: real;\nr := 1.0e999"), vec!["Real literal 1.0e999 out of range."]);
    }

    #[test]
    fn calls_are_checked_against_declarations() {
        let src = "program t;\n\
                   function add(a: integer, b: integer): integer;\nbegin return a + b end;\n\
                   procedure show(s: string);\nbegin writeln(s) end;\n\
                   begin\n\
                   var x: integer;\n\
                   x := add(1, 2);\n\
                   x := add(1);\n\
                   x := add(1, \"2\");\n\
                   show(\"ok\");\n\
                   x := show(\"no\");\n\
                   nothing()\n\
                   end.";
        assert_eq!(
            check(src),
            vec![
                "add expects 2 arguments, found 1.",
                "Type mismatch: argument 2 of add expects integer, found string.",
                "show does not return a value.",
                "nothing not in scope.",
            ]
        );
    }

    #[test]
    fn subroutine_names_must_be_unique() {
        let src = "program t;\nprocedure p();\nbegin end;\nprocedure p();\nbegin end;\n\
                   procedure writeln();\nbegin end;\nbegin end.";
        assert_eq!(check(src), vec!["p already in scope.", "writeln already in scope."]);
    }

    #[test]
    fn parameters_share_the_body_frame() {
        let src = "program t;\nprocedure p(a: integer);\nbegin var a: integer end;\nbegin end.";
        assert_eq!(check(src), vec!["a already in scope."]);
    }

    #[test]
    fn functions_do_not_see_main_locals() {
        let src = "program t;\nprocedure p();\nbegin x := 1 end;\nbegin var x: integer; p() end.";
        assert_eq!(check(src), vec!["x not in scope."]);
    }

    #[test]
    fn return_rules() {
        let src = "program t;\n\
                   function f(): integer;\nbegin return end;\n\
                   function g(): integer;\nbegin return \"s\" end;\n\
                   procedure p();\nbegin return 1 end;\n\
                   begin return 0 end.";
        assert_eq!(
            check(src),
            vec![
                "Function f must return a value of type integer.",
                "Type mismatch: g returns integer, found string.",
                "Cannot return a value from procedure p.",
                "Cannot return a value from the main program.",
            ]
        );
    }

    #[test]
    fn writeln_rejects_arrays() {
        let diags = check_body("var a: array [2] of integer;\nwriteln(a)");
        assert_eq!(diags, vec!["Cannot write value of type integer_arr."]);
    }

    #[test]
    fn types_and_signatures_are_annotated() {
        let mut program = lowered("program t;\nbegin\nvar x: real;\nx := 2.5 * 2.0;\nwriteln(\"x=\", x, x > 1.0)\nend.");
        assert!(analyze(&mut program).is_empty());

        let StmtKind::Assign { expr, .. } = &program.scope.statements[1].kind else {
            panic!("expected assignment");
        };
        assert_eq!(expr.ty, Type::Real);
        assert!(matches!(expr.kind, ExprKind::Binary { .. }));

        let StmtKind::Call(call) = &program.scope.statements[2].kind else {
            panic!("expected call");
        };
        assert_eq!(call.signature, Signature(vec![Type::String, Type::Real, Type::Boolean]));
        assert_eq!(call.signature.to_string(), "string_real_boolean");
    }

    #[test]
    fn every_error_is_reported_in_one_pass() {
        let diags = check_body("a := 1;\nb := 2;\nvar c: integer;\nc := \"x\";\nvar c: real");
        assert_eq!(diags.len(), 4);
    }
}
