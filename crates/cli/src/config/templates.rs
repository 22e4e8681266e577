/// Example workspace configuration written by `depcmd init`.
///
/// Adds a framework with its own package manager, category and command on
/// top of the built-in configuration.
pub fn create_workspace_config() -> String {
    // Raw JSON keeps the field order readable for people editing the file
    r#"{
  "version": "1.0.0",
  "projectTypes": [
    {
      "id": "phoenix",
      "displayName": "Phoenix",
      "aliases": ["elixir"],
      "priority": 85,
      "detectionRules": [
        {
          "name": "mix-exs",
          "type": "file_exists",
          "target": "mix.exs",
          "weight": 60,
          "required": true
        },
        {
          "name": "phoenix-dependency",
          "type": "file_content",
          "target": "mix.exs",
          "weight": 30,
          "config": { "pattern": ":phoenix" }
        },
        {
          "name": "elixir-sources",
          "type": "custom",
          "target": "elixirSources",
          "weight": 10
        }
      ],
      "packageManagers": [
        {
          "id": "mix",
          "displayName": "Mix",
          "detectionRules": [
            { "name": "mix-lock", "type": "file_exists", "target": "mix.lock", "weight": 100 }
          ]
        }
      ]
    }
  ],
  "categories": [
    {
      "id": "phoenix",
      "displayName": "Phoenix",
      "icon": "flame",
      "supportedProjectTypes": ["phoenix"],
      "conditions": { "requiredPackageManager": "mix" }
    }
  ],
  "commands": [
    {
      "label": "Phoenix server",
      "command": "mix phx.server",
      "description": "Start the development server",
      "category": "phoenix"
    }
  ],
  "customFunctions": {
    "elixirSources": "hasExtension:ex"
  },
  "detection": {
    "strategy": "balanced",
    "minDetectionScore": 50
  }
}
"#
    .to_string()
}
