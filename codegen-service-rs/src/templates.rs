//! Deterministic fallback used when the generative backend is unavailable.
//!
//! Selection lower-cases the prompt and walks [`RULES`] in priority order; the
//! first rule whose keywords match decides the template. The selector is total:
//! every `(prompt, language, request_type)` yields code and an explanation.

use crate::models::{GenerationResult, RequestType};

/// Template kinds a language catalog may define
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    ReactComponent,
    Api,
    ApiEndpoint,
    Function,
    Class,
}

/// Intent inferred from the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    ReactComponent,
    Api,
    Function,
    Class,
}

impl Intent {
    /// Catalog keys to try, in order
    fn template_kinds(&self) -> &'static [TemplateKind] {
        match self {
            Intent::ReactComponent => &[TemplateKind::ReactComponent],
            Intent::Api => &[TemplateKind::Api, TemplateKind::ApiEndpoint],
            Intent::Function => &[TemplateKind::Function],
            Intent::Class => &[TemplateKind::Class],
        }
    }

    fn explanation(&self) -> &'static str {
        match self {
            Intent::ReactComponent => "Generated React component template",
            Intent::Api => "Generated API template",
            Intent::Function => "Generated function template",
            Intent::Class => "Generated class template",
        }
    }
}

/// Languages whose class template may be selected
pub const CLASS_TEMPLATE_LANGUAGES: &[&str] = &["python", "java", "typescript"];

struct Rule {
    keywords: &'static [&'static str],
    class_gate: bool,
    intent: Intent,
}

impl Rule {
    fn matches(&self, prompt_lower: &str, catalog_id: &str) -> bool {
        let keyword_hit = self.keywords.iter().any(|k| prompt_lower.contains(k));
        keyword_hit && (!self.class_gate || CLASS_TEMPLATE_LANGUAGES.contains(&catalog_id))
    }
}

const RULES: &[Rule] = &[
    Rule { keywords: &["react", "component"], class_gate: false, intent: Intent::ReactComponent },
    Rule { keywords: &["api", "endpoint", "server"], class_gate: false, intent: Intent::Api },
    Rule { keywords: &["function"], class_gate: false, intent: Intent::Function },
    Rule { keywords: &["class"], class_gate: true, intent: Intent::Class },
];

pub const GENERIC_EXPLANATION: &str = "Basic template generated. For advanced AI-powered code generation, please configure an LLM API key.";

struct Catalog {
    id: &'static str,
    templates: &'static [(TemplateKind, &'static str)],
}

impl Catalog {
    fn get(&self, kind: TemplateKind) -> Option<&'static str> {
        self.templates.iter().find(|(k, _)| *k == kind).map(|(_, t)| *t)
    }
}

const CATALOGS: &[Catalog] = &[
    Catalog {
        id: "javascript",
        templates: &[
            (TemplateKind::ReactComponent, JS_REACT_COMPONENT),
            (TemplateKind::ApiEndpoint, JS_API_ENDPOINT),
            (TemplateKind::Function, JS_FUNCTION),
        ],
    },
    Catalog {
        id: "typescript",
        templates: &[
            (TemplateKind::ReactComponent, TS_REACT_COMPONENT),
            (TemplateKind::ApiEndpoint, TS_API_ENDPOINT),
            (TemplateKind::Function, TS_FUNCTION),
            (TemplateKind::Class, TS_CLASS),
        ],
    },
    Catalog {
        id: "python",
        templates: &[
            (TemplateKind::Function, PY_FUNCTION),
            (TemplateKind::Class, PY_CLASS),
            (TemplateKind::Api, PY_API),
        ],
    },
    Catalog {
        id: "java",
        templates: &[(TemplateKind::Function, JAVA_FUNCTION), (TemplateKind::Class, JAVA_CLASS)],
    },
    Catalog { id: "go", templates: &[(TemplateKind::Function, GO_FUNCTION)] },
    Catalog { id: "rust", templates: &[(TemplateKind::Function, RUST_FUNCTION)] },
];

/// Maps a requested language to a catalog id; `nodejs` and `react` share the JavaScript catalog.
fn catalog_for(language: &str) -> Option<&'static Catalog> {
    let normalized = language.trim().to_ascii_lowercase();
    let id = match normalized.as_str() {
        "nodejs" | "node" | "react" | "js" => "javascript",
        "ts" => "typescript",
        "py" => "python",
        other => other,
    };
    CATALOGS.iter().find(|c| c.id == id)
}

/// First matching intent in priority order, ignoring catalogs.
pub fn infer_intent(prompt: &str, language: &str) -> Option<Intent> {
    let prompt_lower = prompt.to_lowercase();
    let catalog_id = catalog_for(language).map(|c| c.id).unwrap_or("");
    RULES
        .iter()
        .find(|rule| rule.matches(&prompt_lower, catalog_id))
        .map(|rule| rule.intent)
}

pub fn select_template(prompt: &str, language: &str, request_type: RequestType) -> GenerationResult {
    let Some(catalog) = catalog_for(language) else {
        log::debug!("No template catalog for '{}' ({} request)", language, request_type);
        return generic_placeholder(prompt, language);
    };

    match infer_intent(prompt, language) {
        Some(intent) => {
            let code = intent
                .template_kinds()
                .iter()
                .find_map(|kind| catalog.get(*kind))
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} Template not available", comment_token(catalog.id)));
            GenerationResult::from_template(code, intent.explanation())
        }
        None => generic_placeholder(prompt, language),
    }
}

fn generic_placeholder(prompt: &str, language: &str) -> GenerationResult {
    let comment = comment_token(language);
    let code = format!(
        "{comment} {} code for: {prompt}\n{comment} Template-based generation - please provide an LLM API key for advanced features",
        title_case(language)
    );
    GenerationResult::from_template(code, GENERIC_EXPLANATION)
}

fn comment_token(language: &str) -> &'static str {
    match language.trim().to_ascii_lowercase().as_str() {
        "python" | "py" | "bash" | "sh" | "shell" | "ruby" | "r" | "perl" | "yaml" | "toml" => "#",
        "sql" | "lua" | "haskell" => "--",
        _ => "//",
    }
}

/// Upper-cases the first letter of each alphabetic run and lower-cases the rest.
fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut previous_is_letter = false;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(ch);
            previous_is_letter = false;
        }
    }
    out
}

const JS_REACT_COMPONENT: &str = r#"import React, { useState, useEffect } from 'react';

const MyComponent = () => {
  const [data, setData] = useState(null);
  const [loading, setLoading] = useState(true);

  useEffect(() => {
    // Fetch data or initialize component
    setLoading(false);
  }, []);

  if (loading) return <div>Loading...</div>;

  return (
    <div className="my-component">
      <h1>My Component</h1>
      {/* Add your content here */}
    </div>
  );
};

export default MyComponent;"#;

const JS_API_ENDPOINT: &str = r#"const express = require('express');
const router = express.Router();

// GET endpoint
router.get('/api/data', async (req, res) => {
  try {
    // Your logic here
    res.json({ success: true, data: [] });
  } catch (error) {
    res.status(500).json({ error: error.message });
  }
});

// POST endpoint
router.post('/api/data', async (req, res) => {
  try {
    const { body } = req;
    // Process data
    res.json({ success: true, message: 'Data created' });
  } catch (error) {
    res.status(500).json({ error: error.message });
  }
});

module.exports = router;"#;

const JS_FUNCTION: &str = r#"function myFunction(param1, param2) {
  // Add your logic here
  try {
    const result = param1 + param2;
    return result;
  } catch (error) {
    console.error('Error:', error);
    return null;
  }
}"#;

const TS_REACT_COMPONENT: &str = r#"import React, { useState, useEffect } from 'react';

interface MyComponentProps {
  title?: string;
}

const MyComponent: React.FC<MyComponentProps> = ({ title = 'My Component' }) => {
  const [data, setData] = useState<unknown>(null);
  const [loading, setLoading] = useState<boolean>(true);

  useEffect(() => {
    // Fetch data or initialize component
    setLoading(false);
  }, []);

  if (loading) return <div>Loading...</div>;

  return (
    <div className="my-component">
      <h1>{title}</h1>
      {/* Add your content here */}
    </div>
  );
};

export default MyComponent;"#;

const TS_API_ENDPOINT: &str = r#"import { Router, Request, Response } from 'express';

const router = Router();

router.get('/api/data', async (_req: Request, res: Response) => {
  try {
    res.json({ success: true, data: [] });
  } catch (error) {
    res.status(500).json({ error: (error as Error).message });
  }
});

router.post('/api/data', async (req: Request, res: Response) => {
  try {
    const { body } = req;
    res.json({ success: true, message: 'Data created', body });
  } catch (error) {
    res.status(500).json({ error: (error as Error).message });
  }
});

export default router;"#;

const TS_FUNCTION: &str = r#"function myFunction(param1: number, param2: number): number | null {
  // Add your logic here
  try {
    return param1 + param2;
  } catch (error) {
    console.error('Error:', error);
    return null;
  }
}"#;

const TS_CLASS: &str = r#"class MyClass<T> {
  private data: T[] = [];

  constructor(public readonly name: string) {}

  addData(item: T): number {
    this.data.push(item);
    return this.data.length;
  }

  getData(): T[] {
    return [...this.data];
  }

  toString(): string {
    return `MyClass(name=${this.name}, items=${this.data.length})`;
  }
}"#;

const PY_FUNCTION: &str = r#"def my_function(param1, param2):
    """
    Description of the function

    Args:
        param1: Description of param1
        param2: Description of param2

    Returns:
        Description of return value
    """
    try:
        result = param1 + param2
        return result
    except Exception as e:
        print(f"Error: {e}")
        return None"#;

const PY_CLASS: &str = r#"class MyClass:
    def __init__(self, name):
        self.name = name
        self.data = []

    def add_data(self, item):
        """Add an item to the data list"""
        self.data.append(item)
        return len(self.data)

    def get_data(self):
        """Get all data"""
        return self.data

    def __str__(self):
        return f"MyClass(name={self.name}, items={len(self.data)})""#;

const PY_API: &str = r#"from fastapi import FastAPI, HTTPException
from pydantic import BaseModel
from typing import List, Optional

app = FastAPI()

class Item(BaseModel):
    id: Optional[int] = None
    name: str
    description: Optional[str] = None

@app.get("/api/items")
async def get_items():
    return {"items": []}

@app.post("/api/items")
async def create_item(item: Item):
    return {"message": "Item created", "item": item}

@app.get("/api/items/{item_id}")
async def get_item(item_id: int):
    return {"item_id": item_id}"#;

const JAVA_FUNCTION: &str = r#"public static Integer myFunction(Integer param1, Integer param2) {
    // Add your logic here
    try {
        return param1 + param2;
    } catch (Exception e) {
        System.err.println("Error: " + e.getMessage());
        return null;
    }
}"#;

const JAVA_CLASS: &str = r#"import java.util.ArrayList;
import java.util.List;

public class MyClass {
    private final String name;
    private final List<Object> data = new ArrayList<>();

    public MyClass(String name) {
        this.name = name;
    }

    public int addData(Object item) {
        data.add(item);
        return data.size();
    }

    public List<Object> getData() {
        return data;
    }

    @Override
    public String toString() {
        return "MyClass(name=" + name + ", items=" + data.size() + ")";
    }
}"#;

const GO_FUNCTION: &str = r#"func myFunction(param1, param2 int) (int, error) {
	// Add your logic here
	result := param1 + param2
	return result, nil
}"#;

const RUST_FUNCTION: &str = r#"fn my_function(param1: i64, param2: i64) -> Option<i64> {
    // Add your logic here
    param1.checked_add(param2)
}"#;
