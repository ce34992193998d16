use crate::parser::Rule;
use crate::{new_parser_error, Result};
use pest::iterators::Pair;
use turtle_ast::{ArithOp, CompareOp, Cond, Exp, FunDec, Param, Position, Program, Stmt, VarDec};

fn pos_of(pair: &Pair<Rule>) -> Position {
    let (line, col) = pair.as_span().start_pos().line_col();
    Position::new(line as u32, col as u32)
}

pub fn build_program(pair: Pair<Rule>) -> Result<Program> {
    debug_assert_eq!(pair.as_rule(), Rule::program);

    let mut pairs = pair.into_inner();
    let globals = build_var_dec_list(pairs.next().unwrap())?;
    let functions = build_fun_dec_list(pairs.next().unwrap())?;
    let body = build_block(pairs.next().unwrap())?;

    Ok(Program::new(globals, functions, body))
}

fn build_var_dec_list(pair: Pair<Rule>) -> Result<Vec<VarDec>> {
    let mut decs = Vec::new();
    for var_dec in pair.into_inner() {
        decs.extend(build_var_dec(var_dec)?);
    }
    Ok(decs)
}

fn build_var_dec(pair: Pair<Rule>) -> Result<Vec<VarDec>> {
    debug_assert_eq!(pair.as_rule(), Rule::var_dec);
    pair.into_inner().map(build_var_item).collect()
}

fn build_var_item(pair: Pair<Rule>) -> Result<VarDec> {
    debug_assert_eq!(pair.as_rule(), Rule::var_item);
    let pos = pos_of(&pair);
    let mut pairs = pair.into_inner();
    let name = pairs.next().unwrap().as_str().to_owned();
    let init = match pairs.next() {
        Some(exp_pair) => build_exp(exp_pair)?,
        None => Exp::new_int(0, pos),
    };
    Ok(VarDec::new(name, init, pos))
}

fn build_fun_dec_list(pair: Pair<Rule>) -> Result<Vec<FunDec>> {
    pair.into_inner().map(build_fun_dec).collect()
}

fn build_fun_dec(pair: Pair<Rule>) -> Result<FunDec> {
    debug_assert_eq!(pair.as_rule(), Rule::fun_dec);
    let pos = pos_of(&pair);
    let mut pairs = pair.into_inner();
    let name = pairs.next().unwrap().as_str().to_owned();

    let mut next = pairs.next().unwrap();
    let params = if next.as_rule() == Rule::param_list {
        let params = build_param_list(next);
        next = pairs.next().unwrap();
        params
    } else {
        Vec::new()
    };

    debug_assert_eq!(next.as_rule(), Rule::local_dec_list);
    let locals = build_var_dec_list(next)?;

    let body = build_block(pairs.next().unwrap())?;

    Ok(FunDec::new(name, params, locals, body, pos))
}

fn build_param_list(pair: Pair<Rule>) -> Vec<Param> {
    pair.into_inner()
        .map(|p| Param::new(p.as_str(), pos_of(&p)))
        .collect()
}

fn build_block(pair: Pair<Rule>) -> Result<Vec<Stmt>> {
    debug_assert_eq!(pair.as_rule(), Rule::block);
    pair.into_inner().map(build_stmt).collect()
}

fn build_stmt_body(pair: Pair<Rule>) -> Result<Vec<Stmt>> {
    debug_assert_eq!(pair.as_rule(), Rule::stmt_body);
    let inner = pair.into_inner().next().unwrap();
    match inner.as_rule() {
        Rule::block => build_block(inner),
        Rule::stmt => Ok(vec![build_stmt(inner)?]),
        _ => unreachable!(),
    }
}

fn build_stmt(pair: Pair<Rule>) -> Result<Stmt> {
    debug_assert_eq!(pair.as_rule(), Rule::stmt);
    let pos = pos_of(&pair);
    let inner = pair.into_inner().next().unwrap();

    match inner.as_rule() {
        Rule::up_stmt => Ok(Stmt::Up(pos)),
        Rule::down_stmt => Ok(Stmt::Down(pos)),
        Rule::move_stmt => {
            let mut pairs = inner.into_inner();
            let e1 = build_exp(pairs.next().unwrap())?;
            let e2 = build_exp(pairs.next().unwrap())?;
            Ok(Stmt::Move(e1, e2, pos))
        }
        Rule::read_stmt => {
            let name = inner.into_inner().next().unwrap().as_str().to_owned();
            Ok(Stmt::Read(name, pos))
        }
        Rule::assign_stmt => {
            let mut pairs = inner.into_inner();
            let name = pairs.next().unwrap().as_str().to_owned();
            let exp = build_exp(pairs.next().unwrap())?;
            Ok(Stmt::Assign(name, exp, pos))
        }
        Rule::if_stmt => {
            let mut pairs = inner.into_inner();
            let cond = build_cond(pairs.next().unwrap())?;
            let then = build_stmt_body(pairs.next().unwrap())?;
            match pairs.next() {
                Some(else_pair) => {
                    let else_ = build_stmt_body(else_pair)?;
                    Ok(Stmt::new_if_else(cond, then, else_, pos))
                }
                None => Ok(Stmt::new_if(cond, then, pos)),
            }
        }
        Rule::while_stmt => {
            let mut pairs = inner.into_inner();
            let cond = build_cond(pairs.next().unwrap())?;
            let body = build_stmt_body(pairs.next().unwrap())?;
            Ok(Stmt::new_while(cond, body, pos))
        }
        Rule::return_stmt => {
            let exp = build_exp(inner.into_inner().next().unwrap())?;
            Ok(Stmt::Return(exp, pos))
        }
        Rule::call_stmt => {
            let mut pairs = inner.into_inner();
            let name = pairs.next().unwrap().as_str().to_owned();
            let args = match pairs.next() {
                Some(arg_list) => build_arg_list(arg_list)?,
                None => Vec::new(),
            };
            Ok(Stmt::Call(name, args, pos))
        }
        Rule::exp_list_stmt => {
            let exps = inner
                .into_inner()
                .map(build_exp)
                .collect::<Result<Vec<_>>>()?;
            Ok(Stmt::ExpList(exps, pos))
        }
        _ => unreachable!(),
    }
}

fn build_arg_list(pair: Pair<Rule>) -> Result<Vec<Exp>> {
    pair.into_inner().map(build_exp).collect()
}

fn build_cond(pair: Pair<Rule>) -> Result<Cond> {
    debug_assert_eq!(pair.as_rule(), Rule::cond);
    let pos = pos_of(&pair);
    let mut pairs = pair.into_inner();
    let left = build_exp(pairs.next().unwrap())?;
    let op_pair = pairs.next().unwrap();
    let op = parse_compare_op(&op_pair)?;
    let right = build_exp(pairs.next().unwrap())?;
    Ok(Cond::new(op, left, right, pos))
}

fn parse_compare_op(pair: &Pair<Rule>) -> Result<CompareOp> {
    Ok(match pair.as_str() {
        "==" => CompareOp::Eq,
        "!=" => CompareOp::Neq,
        "<" => CompareOp::Lt,
        ">" => CompareOp::Gt,
        "<=" => CompareOp::Leq,
        ">=" => CompareOp::Geq,
        other => {
            return Err(new_parser_error(
                pair.as_span(),
                format!("Unknown comparison operator \"{}\"", other),
            ))
        }
    })
}

fn build_exp(pair: Pair<Rule>) -> Result<Exp> {
    debug_assert_eq!(pair.as_rule(), Rule::exp);
    let pos = pos_of(&pair);
    let mut pairs = pair.into_inner();
    let mut result = build_term(pairs.next().unwrap())?;

    while let Some(op_pair) = pairs.next() {
        let op = match op_pair.as_str() {
            "+" => ArithOp::Add,
            "-" => ArithOp::Sub,
            _ => unreachable!(),
        };
        let rhs = build_term(pairs.next().unwrap())?;
        result = Exp::new_op(op, result, rhs, pos);
    }

    Ok(result)
}

fn build_term(pair: Pair<Rule>) -> Result<Exp> {
    debug_assert_eq!(pair.as_rule(), Rule::term);
    let pos = pos_of(&pair);
    let mut pairs = pair.into_inner();
    let mut result = build_factor(pairs.next().unwrap())?;

    while pairs.next().is_some() {
        let rhs = build_factor(pairs.next().unwrap())?;
        result = Exp::new_op(ArithOp::Mul, result, rhs, pos);
    }

    Ok(result)
}

fn build_factor(pair: Pair<Rule>) -> Result<Exp> {
    debug_assert_eq!(pair.as_rule(), Rule::factor);
    let pos = pos_of(&pair);
    let span = pair.as_span();
    let mut pairs = pair.into_inner();
    let first = pairs.next().unwrap();

    match first.as_rule() {
        Rule::int_lit => {
            let value: i32 = first
                .as_str()
                .parse()
                .map_err(|_| new_parser_error(span, "Integer literal out of range".to_owned()))?;
            Ok(Exp::new_int(value, pos))
        }
        Rule::call_exp => build_call_exp(first),
        Rule::var_exp => {
            let name = first.into_inner().next().unwrap().as_str();
            Ok(Exp::new_var(name, pos))
        }
        Rule::factor => {
            let operand = build_factor(first)?;
            Ok(Exp::new_neg(operand, pos))
        }
        Rule::exp => build_exp(first),
        _ => unreachable!(),
    }
}

fn build_call_exp(pair: Pair<Rule>) -> Result<Exp> {
    let pos = pos_of(&pair);
    let mut pairs = pair.into_inner();
    let name = pairs.next().unwrap().as_str().to_owned();
    let args = match pairs.next() {
        Some(arg_list) => build_arg_list(arg_list)?,
        None => Vec::new(),
    };
    Ok(Exp::new_call(name, args, pos))
}
