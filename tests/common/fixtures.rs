//! JSON fixtures shaped like the API's answers

use serde_json::{json, Value};

pub fn user_json(username: &str, role: &str) -> Value {
    json!({
        "id": 1,
        "username": username,
        "email": format!("{}@example.com", username),
        "role": role
    })
}

pub fn report_json(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "date": "2024-03-01",
        "made_by": "Ana",
        "test_environment": "staging",
        "feature_scenario": "Login",
        "test_cases": []
    })
}

pub fn test_case_json(id: i64, report_id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "report_id": report_id,
        "tc_number": format!("TC-{:02}", id),
        "title": "Valid login",
        "expected_result": "Dashboard shown",
        "actual_result": "Dashboard shown",
        "status": status,
        "evidence_files": []
    })
}

pub fn product_json(id: i64, nome: &str, preco: f64, preco_venda: f64) -> Value {
    json!({
        "id": id,
        "nome": nome,
        "descricao": "Peça original",
        "preco": preco,
        "preco_venda": preco_venda
    })
}
